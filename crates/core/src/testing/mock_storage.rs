//! Mock object storage for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{ObjectBody, ObjectStorage, StorageError, StorageResult, UserMetadata};

/// An object held by the mock.
#[derive(Debug, Clone, Default)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub metadata: UserMetadata,
}

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub bucket: String,
    pub key: String,
    /// Contents of the local file at upload time.
    pub body: Vec<u8>,
    pub metadata: UserMetadata,
}

/// Operation a queued error applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOp {
    Get,
    Metadata,
    Put,
}

/// In-memory implementation of the ObjectStorage trait.
///
/// Provides controllable behavior for testing:
/// - Seed objects with bodies and metadata
/// - Record uploads (uploaded objects become readable too)
/// - Inject a one-shot failure per operation
/// - Count calls per operation
///
/// # Example
///
/// ```rust,ignore
/// use fitconv_core::testing::MockStorage;
///
/// let storage = MockStorage::new();
/// storage.insert_object("b", "rides/123.fit", b"fit".to_vec(), metadata).await;
///
/// // Run the pipeline...
///
/// let puts = storage.recorded_puts().await;
/// assert_eq!(puts[0].key, "converted/123.csv");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
    puts: Arc<RwLock<Vec<RecordedPut>>>,
    next_errors: Arc<RwLock<HashMap<StorageOp, StorageError>>>,
    calls: Arc<RwLock<HashMap<StorageOp, usize>>>,
}

impl MockStorage {
    /// Create a new, empty mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object.
    pub async fn insert_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        metadata: UserMetadata,
    ) {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject { body, metadata },
        );
    }

    /// Look up an object, including ones uploaded through the trait.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Get all recorded uploads.
    pub async fn recorded_puts(&self) -> Vec<RecordedPut> {
        self.puts.read().await.clone()
    }

    /// Number of times an operation was called.
    pub async fn call_count(&self, op: StorageOp) -> usize {
        self.calls.read().await.get(&op).copied().unwrap_or(0)
    }

    /// Configure the next call of `op` to fail with the given error.
    pub async fn set_next_error(&self, op: StorageOp, error: StorageError) {
        self.next_errors.write().await.insert(op, error);
    }

    async fn enter(&self, op: StorageOp) -> StorageResult<()> {
        *self.calls.write().await.entry(op).or_insert(0) += 1;
        match self.next_errors.write().await.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn require(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        self.object(bucket, key)
            .await
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    fn backend_name(&self) -> &str {
        "mock"
    }

    async fn get_object_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        self.enter(StorageOp::Get).await?;
        let object = self.require(bucket, key).await?;
        Ok(Box::pin(Cursor::new(object.body)))
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<UserMetadata> {
        self.enter(StorageOp::Metadata).await?;
        Ok(self.require(bucket, key).await?.metadata)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        metadata: &UserMetadata,
    ) -> StorageResult<()> {
        self.enter(StorageOp::Put).await?;
        let body = tokio::fs::read(local_path).await?;

        self.puts.write().await.push(RecordedPut {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: body.clone(),
            metadata: metadata.clone(),
        });
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }
}
