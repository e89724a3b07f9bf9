//! Error type for pipeline operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ConverterError;
use crate::event::EventError;
use crate::format::FormatError;
use crate::storage::StorageError;

use super::types::PipelineStage;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The trigger payload could not be turned into an event.
    #[error("Invalid event: {0}")]
    Event(#[from] EventError),

    /// The storage collaborator failed.
    #[error("Storage failure at {stage}: {source}")]
    Storage {
        stage: PipelineStage,
        #[source]
        source: StorageError,
    },

    /// The object was fetched but no local file exists afterwards.
    #[error("Downloaded file does not exist: {path}")]
    DownloadVerificationFailed { path: PathBuf },

    /// Local filesystem failure in scratch storage.
    #[error("I/O failure at {stage}: {source}")]
    Io {
        stage: PipelineStage,
        #[source]
        source: std::io::Error,
    },

    /// The converted file's name could not be routed to a key.
    #[error("Cannot route output: {0}")]
    Format(#[from] FormatError),

    /// The converter failed.
    #[error("{0}")]
    Conversion(#[from] ConverterError),
}

impl PipelineError {
    pub fn storage(stage: PipelineStage, source: StorageError) -> Self {
        Self::Storage { stage, source }
    }

    pub fn io(stage: PipelineStage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    /// The stage that was being attempted when this error occurred.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Event(_) => PipelineStage::EventParsed,
            Self::Storage { stage, .. } | Self::Io { stage, .. } => *stage,
            Self::DownloadVerificationFailed { .. } => PipelineStage::Downloaded,
            Self::Format(_) => PipelineStage::KeyRouted,
            Self::Conversion(_) => PipelineStage::Converted,
        }
    }
}
