//! Types for the format module.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::FormatError;

/// The two file formats this pipeline converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Garmin FIT (binary)
    Fit,
    /// Comma separated values (text)
    Csv,
}

impl FileFormat {
    /// Classifies an extension token. Comparison is case-insensitive.
    pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
        if extension.eq_ignore_ascii_case("fit") {
            Ok(Self::Fit)
        } else if extension.eq_ignore_ascii_case("csv") {
            Ok(Self::Csv)
        } else {
            Err(FormatError::unsupported(extension))
        }
    }

    /// Returns the canonical (lowercase) file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Csv => "csv",
        }
    }

    /// Direction of the conversion that takes this format as input.
    pub fn conversion_direction(&self) -> Direction {
        match self {
            Self::Fit => Direction::BinaryToText,
            Self::Csv => Direction::TextToBinary,
        }
    }

    /// Stage prefix an object of this format is written back under.
    pub fn stage_prefix(&self) -> StagePrefix {
        match self {
            Self::Fit => StagePrefix::Fixed,
            Self::Csv => StagePrefix::Converted,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which way the external converter is asked to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// FIT -> CSV
    BinaryToText,
    /// CSV -> FIT
    TextToBinary,
}

impl Direction {
    pub fn source(&self) -> FileFormat {
        match self {
            Self::BinaryToText => FileFormat::Fit,
            Self::TextToBinary => FileFormat::Csv,
        }
    }

    pub fn target(&self) -> FileFormat {
        match self {
            Self::BinaryToText => FileFormat::Csv,
            Self::TextToBinary => FileFormat::Fit,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source(), self.target())
    }
}

/// Key prefix naming the pipeline stage that produced an object.
///
/// The prefix follows the format of the *converted* file: a `.fit` result only
/// arises from a csv->fit run, so it lands under `fixed/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagePrefix {
    Fixed,
    Converted,
}

impl StagePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed/",
            Self::Converted => "converted/",
        }
    }
}

impl fmt::Display for StagePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
