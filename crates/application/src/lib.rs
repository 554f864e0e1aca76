//! Sentinel Application - Request pipeline and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for transport, storage and time)
//! - The account store and authorization provider
//! - The token-authenticated request pipeline

pub mod auth;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod progress;

#[cfg(test)]
mod test_support;

pub use auth::{AccountStore, AuthorizationProvider};
pub use error::{RequestError, RequestResult};
pub use pipeline::RequestPipeline;
pub use ports::{
    AccountError, AccountRepository, Clock, DeviceIdSource, FileSystem, FileSystemError, Transport, TransportError,
};
pub use progress::ProgressReporter;
