//! Mock converter for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::converter::{ConversionPlan, ConversionResult, Converter, ConverterError};

/// A recorded conversion for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The plan that was resolved for the input.
    pub plan: ConversionPlan,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Resolves plans exactly like the real converter, then writes a canned output
/// file instead of launching a process.
///
/// # Example
///
/// ```rust,ignore
/// use fitconv_core::testing::MockConverter;
///
/// let converter = MockConverter::new(scratch_dir);
/// converter.set_output_lines(vec!["FIT CSV Tool".into()]).await;
///
/// let result = converter.convert(Path::new("/tmp/ride.fit")).await?;
/// assert!(result.output_path.ends_with("ride.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    scratch_dir: PathBuf,
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    next_error: Arc<RwLock<Option<ConverterError>>>,
    output_body: Arc<RwLock<Vec<u8>>>,
    output_lines: Arc<RwLock<Vec<String>>>,
    write_output: Arc<RwLock<bool>>,
}

impl MockConverter {
    /// Create a new mock converter writing into `scratch_dir`.
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            conversions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            output_body: Arc::new(RwLock::new(b"converted".to_vec())),
            output_lines: Arc::new(RwLock::new(Vec::new())),
            write_output: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the bytes written to the output file.
    pub async fn set_output_body(&self, body: Vec<u8>) {
        *self.output_body.write().await = body;
    }

    /// Set the lines reported as converter output.
    pub async fn set_output_lines(&self, lines: Vec<String>) {
        *self.output_lines.write().await = lines;
    }

    /// Whether conversions produce an output file at all.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    async fn run(
        &self,
        input_path: &Path,
        output_tx: Option<mpsc::Sender<String>>,
    ) -> Result<ConversionResult, ConverterError> {
        let plan = self.plan(input_path)?;

        if let Some(err) = self.next_error.write().await.take() {
            self.conversions.write().await.push(RecordedConversion {
                plan,
                success: false,
            });
            return Err(err);
        }

        let lines = self.output_lines.read().await.clone();
        if let Some(tx) = output_tx {
            for line in &lines {
                let _ = tx.send(line.clone()).await;
            }
        }

        let body = self.output_body.read().await.clone();
        if *self.write_output.read().await {
            if let Some(parent) = plan.output_path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ConverterError::conversion_failed(e.to_string(), Vec::new()))?;
            }
            tokio::fs::write(&plan.output_path, &body)
                .await
                .map_err(|e| ConverterError::conversion_failed(e.to_string(), Vec::new()))?;
        }

        self.conversions.write().await.push(RecordedConversion {
            plan: plan.clone(),
            success: true,
        });

        Ok(ConversionResult {
            input_path: plan.input_path,
            output_path: plan.output_path,
            direction: plan.direction,
            output_size_bytes: body.len() as u64,
            output_lines: lines,
            duration_ms: 0,
        })
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    fn plan(&self, input_path: &Path) -> Result<ConversionPlan, ConverterError> {
        Ok(ConversionPlan::for_input(input_path, &self.scratch_dir)?)
    }

    async fn convert(&self, input_path: &Path) -> Result<ConversionResult, ConverterError> {
        self.run(input_path, None).await
    }

    async fn convert_with_output(
        &self,
        input_path: &Path,
        output_tx: mpsc::Sender<String>,
    ) -> Result<ConversionResult, ConverterError> {
        self.run(input_path, Some(output_tx)).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        Ok(())
    }
}
