//! Object storage boundary.
//!
//! The pipeline reads the source object's bytes and user metadata through
//! [`ObjectStorage`] and writes the converted file back through it. [`S3Storage`]
//! is the production backend.

mod config;
mod metadata;
mod s3;
mod traits;

pub use config::StorageConfig;
pub use metadata::{ObjectMetadata, ACTIVITY_ID_KEY, EXTERNAL_ID_KEY, ORIGINAL_NAME_KEY};
pub use s3::S3Storage;
pub use traits::{ObjectBody, ObjectStorage, StorageError, StorageResult, UserMetadata};
