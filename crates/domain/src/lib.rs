//! Sentinel Domain - Core types
//!
//! This crate defines the value types of the authenticated request
//! pipeline: tokens, authorization grants, requests, the persisted
//! account record and client configuration.
//! All types here are pure Rust with no I/O dependencies.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod id;
pub mod request;
pub mod response;

pub use account::{ACCOUNT_SCHEMA_VERSION, AccountRecord};
pub use auth::{AuthorizationData, AuthorizationGrant, AuthorizationStatus, Token, TokenPayloadFormat};
pub use config::{AuthEndpoints, ClientConfig};
pub use error::{DomainError, DomainResult};
pub use id::generate_device_id;
pub use request::{ApiRequest, HttpMethod, TransportRequest};
pub use response::TransportResponse;
