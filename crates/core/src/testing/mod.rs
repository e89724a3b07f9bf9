//! Testing utilities and mock implementations.
//!
//! This module provides test doubles for the storage and converter
//! collaborators, allowing the whole pipeline to run without S3 or a JVM.
//!
//! # Example
//!
//! ```rust,ignore
//! use fitconv_core::testing::{fixtures, MockConverter, MockStorage};
//!
//! let storage = Arc::new(MockStorage::new());
//! let converter = Arc::new(MockConverter::new(scratch_dir));
//! let pipeline = ConversionPipeline::new(config, storage.clone(), converter.clone());
//!
//! let outcome = pipeline.handle_event(&fixtures::s3_event("b", "rides/123.fit")).await;
//! ```

mod mock_converter;
mod mock_storage;

pub use mock_converter::{MockConverter, RecordedConversion};
pub use mock_storage::{MockStorage, RecordedPut, StorageOp, StoredObject};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::event::{S3Bucket, S3Entity, S3Event, S3EventRecord, S3Object};
    use crate::storage::UserMetadata;

    /// Create a single-record bucket notification.
    pub fn s3_event(bucket: &str, key: &str) -> S3Event {
        s3_event_with_keys(bucket, &[key])
    }

    /// Create a bucket notification with one record per key, in order.
    pub fn s3_event_with_keys(bucket: &str, keys: &[&str]) -> S3Event {
        S3Event {
            records: keys
                .iter()
                .map(|key| S3EventRecord {
                    event_name: Some("ObjectCreated:Put".to_string()),
                    s3: S3Entity {
                        bucket: S3Bucket {
                            name: bucket.to_string(),
                        },
                        object: S3Object {
                            key: key.to_string(),
                            size: None,
                        },
                    },
                })
                .collect(),
        }
    }

    /// Build a user-metadata map from pairs.
    pub fn user_metadata(entries: &[(&str, &str)]) -> UserMetadata {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// The metadata of the morning-ride scenario.
    pub fn ride_metadata() -> UserMetadata {
        user_metadata(&[
            ("Original_Name", "morning.fit"),
            ("External_Id", "ext-9"),
            ("Activity_Id", "act-9"),
        ])
    }
}
