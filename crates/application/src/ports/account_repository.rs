//! Account repository port
//!
//! Defines the interface for persisting the installation's account record.

use async_trait::async_trait;
use sentinel_domain::AccountRecord;

/// Errors that can occur while reading or writing the account record.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record exists but cannot be decoded.
    #[error("corrupt account record: {0}")]
    Corrupt(String),

    /// The record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Loads the stored record.
    ///
    /// # Returns
    /// `None` if no record was ever saved.
    ///
    /// # Errors
    /// Returns `Corrupt` if the record cannot be decoded.
    async fn load(&self) -> Result<Option<AccountRecord>, AccountError>;

    /// Saves the record, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn save(&self, record: &AccountRecord) -> Result<(), AccountError>;
}
