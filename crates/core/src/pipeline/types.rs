//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::storage::ObjectMetadata;

/// Steps of a single invocation, in order. Any step may jump to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Start,
    EventParsed,
    Downloaded,
    MetadataRead,
    Converted,
    KeyRouted,
    Uploaded,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::EventParsed => "event_parsed",
            Self::Downloaded => "downloaded",
            Self::MetadataRead => "metadata_read",
            Self::Converted => "converted",
            Self::KeyRouted => "key_routed",
            Self::Uploaded => "uploaded",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single string an invocation reports back to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineOutcome {
    #[serde(rename = "OK")]
    Ok,
    Error,
}

impl PipelineOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "Error",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Bucket read from and written to.
    pub bucket: String,
    /// Key of the object that triggered the run.
    pub source_key: String,
    /// Where the object was downloaded to.
    pub local_input: PathBuf,
    /// Where the converter wrote its result.
    pub local_output: PathBuf,
    /// Key the converted file was uploaded under.
    pub output_key: String,
    /// Metadata carried to the output object.
    pub metadata: ObjectMetadata,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}
