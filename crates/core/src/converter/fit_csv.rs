//! FitCSVTool-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionPlan, ConversionResult};

/// Converter that shells out to the FIT SDK's FitCSVTool.
pub struct FitCsvToolConverter {
    config: ConverterConfig,
}

/// Which pipe a converter line came from.
#[derive(Debug, Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl FitCsvToolConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds the argument list: leading program args, direction flag, input, output.
    fn build_args(&self, plan: &ConversionPlan) -> Vec<String> {
        let mut args = self.config.program_args.clone();
        args.push(self.config.flag_for(plan.direction).to_string());
        args.push(plan.input_path.to_string_lossy().to_string());
        args.push(plan.output_path.to_string_lossy().to_string());
        args
    }

    fn record_line(
        lines: &mut Vec<String>,
        output_tx: Option<&mpsc::Sender<String>>,
        stream: OutputStream,
        line: String,
    ) {
        info!(target: "fitconv::converter", stream = stream.as_str(), "{}", line);
        if let Some(tx) = output_tx {
            // Non-blocking send
            let _ = tx.try_send(line.clone());
        }
        lines.push(line);
    }

    /// Runs the conversion, draining both output pipes before waiting on exit.
    async fn run_conversion(
        &self,
        input_path: &Path,
        output_tx: Option<mpsc::Sender<String>>,
    ) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();
        let plan = self.plan(input_path)?;

        if let Some(parent) = plan.output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConverterError::io("creating scratch directory", parent, e))?;
        }

        // The output check below must only see what this run writes.
        match tokio::fs::remove_file(&plan.output_path).await {
            Ok(()) => debug!(output = %plan.output_path.display(), "Removed stale output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConverterError::io(
                    "removing stale output",
                    &plan.output_path,
                    e,
                ))
            }
        }

        let args = self.build_args(&plan);
        info!(
            input = %plan.input_path.display(),
            output = %plan.output_path.display(),
            direction = %plan.direction,
            flag = self.config.flag_for(plan.direction),
            "Starting converter"
        );
        debug!(program = %self.config.program.display(), ?args, "Converter command line");

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::conversion_failed(
                        format!("Converter not found at path: {}", self.config.program.display()),
                        Vec::new(),
                    )
                } else {
                    ConverterError::io("starting converter", &self.config.program, e)
                }
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(ConverterError::conversion_failed(
                    "Converter output pipes were not captured",
                    Vec::new(),
                ))
            }
        };

        let drain = async {
            let mut stdout = BufReader::new(stdout).lines();
            let mut stderr = BufReader::new(stderr).lines();
            let mut stdout_open = true;
            let mut stderr_open = true;
            let mut lines = Vec::new();

            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout.next_line(), if stdout_open => match line? {
                        Some(line) => Self::record_line(&mut lines, output_tx.as_ref(), OutputStream::Stdout, line),
                        None => stdout_open = false,
                    },
                    line = stderr.next_line(), if stderr_open => match line? {
                        Some(line) => Self::record_line(&mut lines, output_tx.as_ref(), OutputStream::Stderr, line),
                        None => stderr_open = false,
                    },
                }
            }

            // Wait for process to complete
            let status = child.wait().await?;
            Ok::<(ExitStatus, Vec<String>), std::io::Error>((status, lines))
        };

        let result = match self.config.timeout_secs {
            Some(timeout_secs) => timeout(Duration::from_secs(timeout_secs), drain).await,
            None => Ok(drain.await),
        };

        let (status, lines) = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                return Err(ConverterError::io(
                    "draining converter output",
                    &plan.input_path,
                    e,
                ))
            }
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs.unwrap_or_default(),
                });
            }
        };

        if !status.success() {
            error!(
                input = %plan.input_path.display(),
                code = ?status.code(),
                "Converter exited unsuccessfully"
            );
            return Err(ConverterError::conversion_failed(
                format!("Converter exited with code: {:?}", status.code()),
                lines,
            ));
        }

        // Verify output exists and get size
        let output_size_bytes = match tokio::fs::metadata(&plan.output_path).await {
            Ok(meta) if meta.len() > 0 => meta.len(),
            Ok(_) => {
                return Err(ConverterError::conversion_failed(
                    format!("Output file is empty: {}", plan.output_path.display()),
                    lines,
                ))
            }
            Err(_) => {
                return Err(ConverterError::conversion_failed(
                    format!("Output file not created: {}", plan.output_path.display()),
                    lines,
                ))
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            output = %plan.output_path.display(),
            size_bytes = output_size_bytes,
            duration_ms,
            "Conversion complete"
        );

        Ok(ConversionResult {
            input_path: plan.input_path,
            output_path: plan.output_path,
            direction: plan.direction,
            output_size_bytes,
            output_lines: lines,
            duration_ms,
        })
    }
}

#[async_trait]
impl Converter for FitCsvToolConverter {
    fn name(&self) -> &str {
        "fitcsvtool"
    }

    fn plan(&self, input_path: &Path) -> Result<ConversionPlan, ConverterError> {
        Ok(ConversionPlan::for_input(input_path, &self.config.scratch_dir)?)
    }

    async fn convert(&self, input_path: &Path) -> Result<ConversionResult, ConverterError> {
        self.run_conversion(input_path, None).await
    }

    async fn convert_with_output(
        &self,
        input_path: &Path,
        output_tx: mpsc::Sender<String>,
    ) -> Result<ConversionResult, ConverterError> {
        self.run_conversion(input_path, Some(output_tx)).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        // Only checks that the program can be launched.
        let mut child = Command::new(&self.config.program)
            .args(&self.config.program_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::conversion_failed(
                        format!("Converter not found at path: {}", self.config.program.display()),
                        Vec::new(),
                    )
                } else {
                    ConverterError::io("starting converter", &self.config.program, e)
                }
            })?;
        let _ = child.kill().await;

        tokio::fs::create_dir_all(&self.config.scratch_dir)
            .await
            .map_err(|e| ConverterError::io("creating scratch directory", &self.config.scratch_dir, e))?;

        Ok(())
    }
}
