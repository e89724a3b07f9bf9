//! Pipeline orchestrator.
//!
//! One invocation walks a single object through
//! `Start -> EventParsed -> Downloaded -> MetadataRead -> Converted -> KeyRouted -> Uploaded -> Done`.
//! The first error aborts the run. Scratch files are removed when the run ends.

mod config;
mod error;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use runner::ConversionPipeline;
pub use types::{PipelineOutcome, PipelineReport, PipelineStage};
