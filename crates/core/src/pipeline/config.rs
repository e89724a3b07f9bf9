//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::event::RecordSelection;

/// Configuration for the conversion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scratch directory for downloaded and converted files.
    #[serde(default = "crate::converter::default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Which records of a notification are processed.
    #[serde(default)]
    pub record_selection: RecordSelection,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scratch_dir: crate::converter::default_scratch_dir(),
            record_selection: RecordSelection::default(),
        }
    }
}

impl PipelineConfig {
    /// Sets the scratch directory.
    pub fn with_scratch_dir(mut self, scratch_dir: PathBuf) -> Self {
        self.scratch_dir = scratch_dir;
        self
    }

    /// Sets the record selection policy.
    pub fn with_record_selection(mut self, selection: RecordSelection) -> Self {
        self.record_selection = selection;
        self
    }
}
