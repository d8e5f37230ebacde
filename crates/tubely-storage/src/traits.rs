//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed reader handed to [`Storage::put_stream`].
pub type ByteStream = Pin<Box<dyn AsyncRead + Send + Unpin>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Video uploads go through whichever backend is configured; thumbnails always
/// go through a [`LocalStorage`](crate::LocalStorage) rooted at the assets directory.
/// Callers choose the key (see [`crate::keys`]); backends only validate it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data under `storage_key` and return its public URL.
    async fn put(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Upload from a reader until EOF without buffering the whole object in
    /// memory. Returns the public URL.
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: ByteStream,
    ) -> StorageResult<String>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL for a key. Pure; does not touch the backend.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_storage_error_mapping() {
        let err: AppError = StorageError::UploadFailed("connection reset".to_string()).into();
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");

        let err: AppError = StorageError::InvalidKey("bad key".to_string()).into();
        assert_eq!(err.http_status_code(), 400);

        let err: AppError = StorageError::NotFound("landscape/x.mp4".to_string()).into();
        assert_eq!(err.http_status_code(), 404);
    }
}
