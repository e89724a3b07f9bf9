//! Error types for the format module.

use thiserror::Error;

/// Errors raised while classifying file names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The path has no `.` at all.
    #[error("No extension in path: {path}")]
    NoExtension { path: String },

    /// The base name does not split into exactly `name.extension`.
    #[error("Malformed file name: {name} (expected exactly one '.')")]
    MalformedFilename { name: String },

    /// The extension is neither `fit` nor `csv`.
    #[error("Unsupported format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl FormatError {
    pub fn no_extension(path: impl Into<String>) -> Self {
        Self::NoExtension { path: path.into() }
    }

    pub fn malformed(name: impl Into<String>) -> Self {
        Self::MalformedFilename { name: name.into() }
    }

    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }
}
