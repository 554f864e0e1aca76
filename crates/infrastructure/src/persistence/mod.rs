//! Persistence implementations for file-based storage.

mod account_repository;
mod file_system;

pub use account_repository::FileAccountRepository;
pub use file_system::TokioFileSystem;
