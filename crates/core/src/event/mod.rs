//! Inbound trigger payload.
//!
//! S3 delivers object keys form-encoded (`+` for spaces, `%XX` escapes); they
//! are decoded here so the rest of the crate only sees real keys.

mod types;

pub use types::{
    ConversionEvent, RecordSelection, S3Bucket, S3Entity, S3Event, S3EventRecord, S3Object,
};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event contains no records")]
    NoRecords,

    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("Object key is not valid URL encoding: {key}")]
    InvalidKey { key: String },
}

impl S3Event {
    /// Parses a bucket notification from JSON.
    pub fn from_json(payload: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(payload).map_err(|e| EventError::InvalidPayload(e.to_string()))
    }

    /// Returns the events to process under `selection`.
    pub fn conversion_events(
        &self,
        selection: RecordSelection,
    ) -> Result<Vec<ConversionEvent>, EventError> {
        if self.records.is_empty() {
            return Err(EventError::NoRecords);
        }

        let take = match selection {
            RecordSelection::FirstOnly => 1,
            RecordSelection::All => self.records.len(),
        };

        if take < self.records.len() {
            debug!(
                dropped = self.records.len() - take,
                "Ignoring additional event records"
            );
        }

        self.records
            .iter()
            .take(take)
            .map(S3EventRecord::conversion_event)
            .collect()
    }
}

impl S3EventRecord {
    /// Extracts bucket and decoded key from this record.
    pub fn conversion_event(&self) -> Result<ConversionEvent, EventError> {
        Ok(ConversionEvent {
            bucket: self.s3.bucket.name.clone(),
            object_key: decode_key(&self.s3.object.key)?,
        })
    }
}

/// Decodes an S3 notification key.
pub fn decode_key(raw: &str) -> Result<String, EventError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|_| EventError::InvalidKey {
            key: raw.to_string(),
        })
}
