//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::format::Direction;

/// Configuration for the FitCSVTool-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program to launch.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Arguments placed before the direction flag.
    #[serde(default = "default_program_args")]
    pub program_args: Vec<String>,

    /// Flag selecting FIT -> CSV.
    #[serde(default = "default_binary_to_text_flag")]
    pub binary_to_text_flag: String,

    /// Flag selecting CSV -> FIT.
    #[serde(default = "default_text_to_binary_flag")]
    pub text_to_binary_flag: String,

    /// Directory converted files are written to. Filled from the pipeline's
    /// scratch directory rather than read from the `[converter]` section.
    #[serde(skip, default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Timeout for a single conversion in seconds. Unbounded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_program() -> PathBuf {
    PathBuf::from("java")
}

fn default_program_args() -> Vec<String> {
    vec!["-jar".to_string(), "lib/FitCSVTool.jar".to_string()]
}

fn default_binary_to_text_flag() -> String {
    "-b".to_string()
}

fn default_text_to_binary_flag() -> String {
    "-c".to_string()
}

pub(crate) fn default_scratch_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            program_args: default_program_args(),
            binary_to_text_flag: default_binary_to_text_flag(),
            text_to_binary_flag: default_text_to_binary_flag(),
            scratch_dir: default_scratch_dir(),
            timeout_secs: None,
        }
    }
}

impl ConverterConfig {
    /// Creates a config launching `program` with no leading arguments.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            program_args: Vec::new(),
            ..Default::default()
        }
    }

    /// Sets the scratch directory.
    pub fn with_scratch_dir(mut self, scratch_dir: PathBuf) -> Self {
        self.scratch_dir = scratch_dir;
        self
    }

    /// Sets the leading program arguments.
    pub fn with_program_args(mut self, args: Vec<String>) -> Self {
        self.program_args = args;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Returns the flag for a direction.
    pub fn flag_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::BinaryToText => &self.binary_to_text_flag,
            Direction::TextToBinary => &self.text_to_binary_flag,
        }
    }
}
