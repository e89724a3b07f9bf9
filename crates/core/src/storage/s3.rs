use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use std::time::Instant;

use super::config::StorageConfig;
use super::traits::{ObjectBody, ObjectStorage, StorageError, StorageResult, UserMetadata};

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Wraps an already configured S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the standard AWS environment plus explicit settings.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn backend_name(&self) -> &str {
        "s3"
    }

    async fn get_object_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        let start = Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return StorageError::not_found(bucket, key);
                }
                tracing::error!(
                    error = %DisplayErrorContext(&service_error),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 get_object failed"
                );
                StorageError::DownloadFailed(service_error.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            content_length = ?output.content_length(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 get_object opened"
        );

        Ok(Box::pin(output.body.into_async_read()))
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> StorageResult<UserMetadata> {
        let start = Instant::now();

        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    return StorageError::not_found(bucket, key);
                }
                tracing::error!(
                    error = %DisplayErrorContext(&service_error),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 head_object failed"
                );
                StorageError::MetadataFailed(service_error.to_string())
            })?;

        Ok(output.metadata().cloned().unwrap_or_default())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        metadata: &UserMetadata,
    ) -> StorageResult<()> {
        let start = Instant::now();

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", local_path.display(), e)))?;

        let metadata = if metadata.is_empty() {
            None
        } else {
            Some(metadata.clone())
        };

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_metadata(metadata)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                tracing::error!(
                    error = %DisplayErrorContext(&service_error),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 put_object failed"
                );
                StorageError::UploadFailed(service_error.to_string())
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
