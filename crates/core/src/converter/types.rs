//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::{classify, split_file_name, Direction, FormatError};

/// A fully resolved conversion: what goes in, what comes out, which way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPlan {
    /// Downloaded input file.
    pub input_path: PathBuf,
    /// Where the converter is told to write its result.
    pub output_path: PathBuf,
    /// Conversion direction selected from the input extension.
    pub direction: Direction,
}

impl ConversionPlan {
    /// Resolves the plan for `input_path`, placing the output in `scratch_dir`.
    ///
    /// The output keeps the input's stem and swaps the extension, so
    /// `/tmp/ride.fit` becomes `<scratch_dir>/ride.csv`.
    pub fn for_input(input_path: &Path, scratch_dir: &Path) -> Result<Self, FormatError> {
        let path_str = input_path.to_string_lossy();
        let (stem, _) = split_file_name(&path_str)?;
        let direction = classify(&path_str)?.conversion_direction();
        let output_path =
            scratch_dir.join(format!("{}.{}", stem, direction.target().extension()));

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_path,
            direction,
        })
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Input file path.
    pub input_path: PathBuf,
    /// Converted file path.
    pub output_path: PathBuf,
    /// Direction that was run.
    pub direction: Direction,
    /// Size of the converted file.
    pub output_size_bytes: u64,
    /// Lines the converter printed, in order.
    pub output_lines: Vec<String>,
    /// Wall time of the conversion in milliseconds.
    pub duration_ms: u64,
}
