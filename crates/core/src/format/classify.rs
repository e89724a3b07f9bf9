//! Path classification and output key routing.

use std::path::Path;

use super::error::FormatError;
use super::types::FileFormat;

/// Returns everything after the last `.` in `path`.
///
/// The token is returned as written; callers compare it case-insensitively
/// (see [`FileFormat::from_extension`]).
pub fn extension_of(path: &str) -> Result<&str, FormatError> {
    path.rfind('.')
        .map(|idx| &path[idx + 1..])
        .ok_or_else(|| FormatError::no_extension(path))
}

/// Returns the final component of `path`, or the whole string if it has none.
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Splits a path's base name into `(stem, extension)`.
///
/// The base name must contain exactly one `.`: `ride.fit` is accepted,
/// `ride` and `ride.tcx.bak` are not.
pub fn split_file_name(path: &str) -> Result<(&str, &str), FormatError> {
    let name = base_name(path);
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(stem), Some(extension), None) => Ok((stem, extension)),
        _ => Err(FormatError::malformed(name)),
    }
}

/// Classifies the format of `path` by its extension.
pub fn classify(path: &str) -> Result<FileFormat, FormatError> {
    FileFormat::from_extension(extension_of(path)?)
}

/// Returns the storage key a converted file is written back under.
///
/// `/tmp/ride.fit` routes to `fixed/ride.fit`, `/tmp/ride.csv` to
/// `converted/ride.csv`.
pub fn output_key_for(converted_path: &str) -> Result<String, FormatError> {
    let name = base_name(converted_path);
    let format = classify(converted_path)?;
    Ok(format!("{}{}", format.stage_prefix(), name))
}
