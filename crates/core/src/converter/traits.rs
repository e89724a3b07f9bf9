//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc;

use super::error::ConverterError;
use super::types::{ConversionPlan, ConversionResult};

/// A converter that turns a FIT file into CSV or the other way round.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Resolves where `input_path` would be converted to, without running anything.
    fn plan(&self, input_path: &Path) -> Result<ConversionPlan, ConverterError>;

    /// Converts the file at `input_path`, returning the converted file's location.
    async fn convert(&self, input_path: &Path) -> Result<ConversionResult, ConverterError>;

    /// Converts the file, forwarding every output line to `output_tx`.
    ///
    /// Lines are sent without blocking; a full or closed channel drops them and
    /// conversion continues.
    async fn convert_with_output(
        &self,
        input_path: &Path,
        output_tx: mpsc::Sender<String>,
    ) -> Result<ConversionResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}
