//! Storage abstraction trait
//!
//! This module defines the object-storage boundary the pipeline talks to.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Metadata fetch failed: {0}")]
    MetadataFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An object's body as a byte stream.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send>>;

/// User-defined metadata attached to an object, as returned by the backend.
pub type UserMetadata = HashMap<String, String>;

/// Object storage collaborator.
///
/// Implementations are explicitly constructed and handed to the pipeline, so a
/// test double can stand in for the real backend.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &str;

    /// Opens the object's body as a stream.
    async fn get_object_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody>;

    /// Fetches the object's user-defined metadata.
    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<UserMetadata>;

    /// Uploads the file at `local_path` under `key`, attaching `metadata`.
    ///
    /// Writes are last-write-wins; no versioning or compare-and-swap is performed.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        metadata: &UserMetadata,
    ) -> StorageResult<()>;
}
