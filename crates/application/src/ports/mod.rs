//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the pipeline and its collaborators.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod account_repository;
mod clock;
mod device_id;
mod file_system;
mod transport;

pub use account_repository::{AccountError, AccountRepository};
pub use clock::Clock;
pub use device_id::DeviceIdSource;
pub use file_system::{FileSystem, FileSystemError};
pub use transport::{Transport, TransportError};
