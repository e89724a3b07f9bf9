//! File-name classification for the FIT/CSV pipeline.
//!
//! Every routing decision in the crate goes through [`extension_of`]: the
//! converter uses it to pick a direction flag and the pipeline uses it to pick
//! the stage prefix of the output key, so the two can never disagree.

mod classify;
mod error;
mod types;

pub use classify::{base_name, classify, extension_of, output_key_for, split_file_name};
pub use error::FormatError;
pub use types::{Direction, FileFormat, StagePrefix};
