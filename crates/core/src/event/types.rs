//! Serde model of an S3 bucket-notification document.

use serde::{Deserialize, Serialize};

/// Inbound bucket notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// Object key, URL-encoded as delivered by S3.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// The one object an invocation works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub bucket: String,
    /// Decoded object key.
    pub object_key: String,
}

/// Which records of a multi-record notification get processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSelection {
    /// Only record 0; the rest are dropped.
    #[default]
    FirstOnly,
    /// Every record, one after another.
    All,
}
