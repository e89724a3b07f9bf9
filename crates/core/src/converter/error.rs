//! Error types for the converter module.

use std::path::Path;
use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Input file name could not be classified.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Conversion process failed to start, exited non-zero or produced nothing.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        /// Lines the converter printed before failing.
        output: Vec<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl ConverterError {
    /// Creates a new conversion failed error with captured output.
    pub fn conversion_failed(reason: impl Into<String>, output: Vec<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            output,
        }
    }

    /// Wraps an I/O fault from launching or draining the converter.
    pub(crate) fn io(context: &str, path: &Path, err: std::io::Error) -> Self {
        Self::conversion_failed(
            format!("{} ({}): {}", context, path.display(), err),
            Vec::new(),
        )
    }

    /// Captured converter output, if any.
    pub fn output(&self) -> &[String] {
        match self {
            Self::ConversionFailed { output, .. } => output,
            _ => &[],
        }
    }
}
