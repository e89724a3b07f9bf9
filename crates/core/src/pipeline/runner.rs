//! The conversion pipeline: fetch, convert, route, store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::converter::Converter;
use crate::event::{ConversionEvent, S3Event};
use crate::format::{base_name, output_key_for};
use crate::storage::{ObjectMetadata, ObjectStorage};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::{PipelineOutcome, PipelineReport, PipelineStage};

/// Runs one storage event through download, conversion and re-upload.
///
/// Both collaborators are injected so either can be replaced by a test double.
pub struct ConversionPipeline {
    config: PipelineConfig,
    storage: Arc<dyn ObjectStorage>,
    converter: Arc<dyn Converter>,
}

impl ConversionPipeline {
    /// Creates a new pipeline.
    pub fn new(
        config: PipelineConfig,
        storage: Arc<dyn ObjectStorage>,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            config,
            storage,
            converter,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handles a bucket notification and collapses the result to `OK` / `Error`.
    ///
    /// Under [`RecordSelection::All`](crate::event::RecordSelection::All) every
    /// record is attempted even if an earlier one failed; the outcome is `Error`
    /// if any of them did.
    pub async fn handle_event(&self, event: &S3Event) -> PipelineOutcome {
        let events = match event.conversion_events(self.config.record_selection) {
            Ok(events) => events,
            Err(e) => {
                error!(stage = %PipelineStage::EventParsed, error = %e, "Rejected event");
                return PipelineOutcome::Error;
            }
        };

        let mut outcome = PipelineOutcome::Ok;
        for event in &events {
            if let Err(e) = self.process(event).await {
                error!(
                    bucket = %event.bucket,
                    key = %event.object_key,
                    stage = %e.stage(),
                    error = %e,
                    "Conversion pipeline failed"
                );
                if let PipelineError::Conversion(ref conversion) = e {
                    for line in conversion.output() {
                        debug!(target: "fitconv::converter", "{}", line);
                    }
                }
                outcome = PipelineOutcome::Error;
            }
        }
        outcome
    }

    /// Processes a single event end to end.
    ///
    /// The downloaded and converted files are removed from scratch storage
    /// once the run ends, whether it succeeded or not, so the local paths in
    /// the returned report no longer exist.
    pub async fn process(&self, event: &ConversionEvent) -> Result<PipelineReport, PipelineError> {
        let span = info_span!(
            "conversion",
            invocation_id = %Uuid::new_v4(),
            bucket = %event.bucket,
            key = %event.object_key,
        );
        let result = self.run(event).instrument(span.clone()).await;
        self.cleanup(&self.local_input_path(event))
            .instrument(span)
            .await;
        result
    }

    fn local_input_path(&self, event: &ConversionEvent) -> PathBuf {
        self.config.scratch_dir.join(base_name(&event.object_key))
    }

    /// Removes the run's input and, when the name resolves, its converted output.
    async fn cleanup(&self, local_input: &Path) {
        let mut paths = vec![local_input.to_path_buf()];
        if let Ok(plan) = self.converter.plan(local_input) {
            paths.push(plan.output_path);
        }

        for path in paths {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed scratch file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scratch file"),
            }
        }
    }

    async fn run(&self, event: &ConversionEvent) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        info!(stage = %PipelineStage::EventParsed, "Processing object");

        let local_input = self.download(event).await?;

        let metadata = self.read_metadata(event).await?;

        let conversion = self.converter.convert(&local_input).await?;
        info!(
            stage = %PipelineStage::Converted,
            converter = self.converter.name(),
            output = %conversion.output_path.display(),
            direction = %conversion.direction,
            "Converted"
        );

        let output_key = output_key_for(&conversion.output_path.to_string_lossy())?;
        info!(stage = %PipelineStage::KeyRouted, output_key = %output_key, "Routed output");

        self.storage
            .put_object(
                &event.bucket,
                &output_key,
                &conversion.output_path,
                &metadata.to_user_metadata(),
            )
            .await
            .map_err(|e| PipelineError::storage(PipelineStage::Uploaded, e))?;
        info!(
            stage = %PipelineStage::Uploaded,
            backend = self.storage.backend_name(),
            output_key = %output_key,
            "Uploaded converted file"
        );

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(stage = %PipelineStage::Done, duration_ms, "Conversion pipeline complete");

        Ok(PipelineReport {
            bucket: event.bucket.clone(),
            source_key: event.object_key.clone(),
            local_input,
            local_output: conversion.output_path,
            output_key,
            metadata,
            output_size_bytes: conversion.output_size_bytes,
            duration_ms,
        })
    }

    /// Streams the object into `scratch_dir/<base name of key>`.
    async fn download(&self, event: &ConversionEvent) -> Result<PathBuf, PipelineError> {
        let stage = PipelineStage::Downloaded;
        let local_path = self.local_input_path(event);

        tokio::fs::create_dir_all(&self.config.scratch_dir)
            .await
            .map_err(|e| PipelineError::io(stage, e))?;

        let mut body = self
            .storage
            .get_object_stream(&event.bucket, &event.object_key)
            .await
            .map_err(|e| PipelineError::storage(stage, e))?;

        let mut file = tokio::fs::File::create(&local_path)
            .await
            .map_err(|e| PipelineError::io(stage, e))?;
        let bytes = tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| PipelineError::io(stage, e))?;
        file.flush().await.map_err(|e| PipelineError::io(stage, e))?;
        drop(file);

        let exists = tokio::fs::try_exists(&local_path)
            .await
            .map_err(|e| PipelineError::io(stage, e))?;
        info!(
            stage = %stage,
            path = %local_path.display(),
            bytes,
            exists,
            "Downloaded object"
        );
        if !exists {
            return Err(PipelineError::DownloadVerificationFailed { path: local_path });
        }

        Ok(local_path)
    }

    /// Fetches the source object's metadata in a separate round-trip.
    async fn read_metadata(&self, event: &ConversionEvent) -> Result<ObjectMetadata, PipelineError> {
        let user_metadata = self
            .storage
            .get_metadata(&event.bucket, &event.object_key)
            .await
            .map_err(|e| PipelineError::storage(PipelineStage::MetadataRead, e))?;

        let metadata = ObjectMetadata::from_user_metadata(&user_metadata);
        info!(
            stage = %PipelineStage::MetadataRead,
            original_name = ?metadata.original_name,
            external_id = ?metadata.external_id,
            activity_id = ?metadata.activity_id,
            "Read metadata"
        );
        Ok(metadata)
    }
}
