//! Sentinel Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading and
//! tracing setup for binaries.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;
pub mod telemetry;

pub use adapters::{ReqwestTransport, SystemClock, UuidDeviceIdSource};
pub use config::{ConfigError, account_path, load_config};
pub use persistence::{FileAccountRepository, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
pub use telemetry::{DEFAULT_FILTER, init_tracing};
