//! Real file system implementation.

use std::path::Path;

use sentinel_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn classify(error: std::io::Error, path: &Path) -> FileSystemError {
    match error.kind() {
        std::io::ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(error),
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| classify(e, path))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| classify(e, parent))?;
        }
        fs::write(path, contents).await.map_err(|e| classify(e, path))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).await.map_err(|e| classify(e, from))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parents_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/file.bin");
        let fs = TokioFileSystem::new();

        fs.write_file(&path, b"hello").await.unwrap();

        assert!(fs.exists(&path).await);
        assert_eq!(fs.read_file(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = TokioFileSystem::new().read_file(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(FileSystemError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let from = dir.path().join("a.tmp");
        let to = dir.path().join("a");
        fs.write_file(&to, b"old").await.unwrap();
        fs.write_file(&from, b"new").await.unwrap();

        fs.rename(&from, &to).await.unwrap();

        assert!(!fs.exists(&from).await);
        assert_eq!(fs.read_file(&to).await.unwrap(), b"new");
    }
}
