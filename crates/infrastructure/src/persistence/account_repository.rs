//! File based account repository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sentinel_application::ports::{AccountError, AccountRepository, FileSystem, FileSystemError};
use sentinel_domain::{ACCOUNT_SCHEMA_VERSION, AccountRecord};
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Stores the account record as a single JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the
/// record, so a crash mid-write leaves the previous record intact.
pub struct FileAccountRepository<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileAccountRepository<F> {
    /// Creates a repository storing the record at `path`.
    #[must_use]
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self { fs, path: path.into() }
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(error: FileSystemError) -> AccountError {
    match error {
        FileSystemError::Io(e) => AccountError::Io(e),
        FileSystemError::NotFound(path) => AccountError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            path.display().to_string(),
        )),
        FileSystemError::PermissionDenied(path) => AccountError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.display().to_string(),
        )),
    }
}

#[async_trait]
impl<F: FileSystem + Send + Sync> AccountRepository for FileAccountRepository<F> {
    async fn load(&self) -> Result<Option<AccountRecord>, AccountError> {
        let bytes = match self.fs.read_file(&self.path).await {
            Ok(bytes) => bytes,
            Err(FileSystemError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };

        let record: AccountRecord = from_json_bytes(&bytes).map_err(|e| AccountError::Corrupt(e.to_string()))?;

        if record.schema_version > ACCOUNT_SCHEMA_VERSION {
            return Err(AccountError::Corrupt(format!(
                "unsupported schema version {} (expected at most {ACCOUNT_SCHEMA_VERSION})",
                record.schema_version
            )));
        }

        Ok(Some(record))
    }

    async fn save(&self, record: &AccountRecord) -> Result<(), AccountError> {
        let bytes = to_json_stable_bytes(record).map_err(|e| AccountError::Serialization(e.to_string()))?;
        let temp = self.temp_path();

        self.fs.write_file(&temp, &bytes).await.map_err(io_error)?;
        self.fs.rename(&temp, &self.path).await.map_err(io_error)?;

        debug!(path = %self.path.display(), "account record saved");
        Ok(())
    }
}
