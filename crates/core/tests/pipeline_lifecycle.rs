//! Pipeline lifecycle integration tests.
//!
//! These tests drive the conversion pipeline with mock storage and converter:
//! - Happy path in both directions (fit -> csv, csv -> fit)
//! - Metadata forwarding, including absent fields
//! - Failures at each stage and the absence of uploads afterwards
//! - Record selection on multi-record notifications
//! - Scratch storage cleanup after every run

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};

use tempfile::TempDir;

use fitconv_core::{
    storage::{ObjectBody, StorageResult, UserMetadata},
    testing::{fixtures, MockConverter, MockStorage, StorageOp},
    ConversionPipeline, ConverterError, ObjectStorage, PipelineConfig, PipelineError,
    PipelineOutcome, PipelineStage, RecordSelection, S3Event, StorageError,
};

/// Test helper wiring a pipeline to mocks in a private scratch directory.
struct TestHarness {
    pipeline: ConversionPipeline,
    storage: MockStorage,
    converter: MockConverter,
    scratch_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_selection(RecordSelection::FirstOnly)
    }

    fn with_selection(selection: RecordSelection) -> Self {
        let scratch_dir = TempDir::new().expect("Failed to create scratch dir");
        let config = PipelineConfig::default()
            .with_scratch_dir(scratch_dir.path().to_path_buf())
            .with_record_selection(selection);

        let storage = MockStorage::new();
        let converter = MockConverter::new(scratch_dir.path());
        let pipeline = ConversionPipeline::new(
            config,
            Arc::new(storage.clone()),
            Arc::new(converter.clone()),
        );

        Self {
            pipeline,
            storage,
            converter,
            scratch_dir,
        }
    }

    fn scratch(&self, name: &str) -> PathBuf {
        self.scratch_dir.path().join(name)
    }

    fn scratch_entries(&self) -> Vec<String> {
        std::fs::read_dir(self.scratch_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    async fn seed(&self, key: &str) {
        self.storage
            .insert_object("b", key, b"source bytes".to_vec(), fixtures::ride_metadata())
            .await;
    }
}

#[tokio::test]
async fn test_fit_object_is_converted_and_uploaded() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/123.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Ok);
    assert_eq!(outcome.as_str(), "OK");

    // Both scratch files are gone once the run ends
    assert!(harness.scratch_entries().is_empty());

    let conversions = harness.converter.recorded_conversions().await;
    assert_eq!(conversions.len(), 1);
    assert_eq!(conversions[0].plan.input_path, harness.scratch("123.fit"));
    assert_eq!(conversions[0].plan.output_path, harness.scratch("123.csv"));

    let puts = harness.storage.recorded_puts().await;
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].bucket, "b");
    assert_eq!(puts[0].key, "converted/123.csv");
    assert_eq!(puts[0].body, b"converted");
    assert_eq!(puts[0].metadata, fixtures::ride_metadata());
}

#[tokio::test]
async fn test_csv_object_is_routed_to_fixed_prefix() {
    let harness = TestHarness::new();
    harness.seed("edited/123.csv").await;

    let event = fixtures::s3_event("b", "edited/123.csv")
        .conversion_events(RecordSelection::FirstOnly)
        .unwrap();
    let report = harness.pipeline.process(&event[0]).await.unwrap();

    assert_eq!(report.output_key, "fixed/123.fit");
    assert_eq!(report.local_input, harness.scratch("123.csv"));
    assert_eq!(report.local_output, harness.scratch("123.fit"));
    assert_eq!(report.metadata.activity_id.as_deref(), Some("act-9"));

    let puts = harness.storage.recorded_puts().await;
    assert_eq!(puts[0].key, "fixed/123.fit");
}

#[tokio::test]
async fn test_reprocessing_produces_identical_upload() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    let event = fixtures::s3_event("b", "rides/123.fit");

    assert_eq!(harness.pipeline.handle_event(&event).await, PipelineOutcome::Ok);
    assert_eq!(harness.pipeline.handle_event(&event).await, PipelineOutcome::Ok);

    let puts = harness.storage.recorded_puts().await;
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0].key, puts[1].key);
    assert_eq!(puts[0].body, puts[1].body);
    assert_eq!(puts[0].metadata, puts[1].metadata);
}

#[tokio::test]
async fn test_absent_metadata_field_stays_absent() {
    let harness = TestHarness::new();
    harness
        .storage
        .insert_object(
            "b",
            "rides/7.fit",
            b"fit".to_vec(),
            fixtures::user_metadata(&[("Original_Name", "seven.fit"), ("External_Id", "e7")]),
        )
        .await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/7.fit"))
        .await;
    assert_eq!(outcome, PipelineOutcome::Ok);

    let puts = harness.storage.recorded_puts().await;
    let metadata = &puts[0].metadata;
    assert_eq!(metadata.get("Original_Name").map(String::as_str), Some("seven.fit"));
    assert_eq!(metadata.get("External_Id").map(String::as_str), Some("e7"));
    assert!(!metadata.contains_key("Activity_Id"));
}

#[tokio::test]
async fn test_encoded_key_is_decoded_before_download() {
    let harness = TestHarness::new();
    harness.seed("my rides/long ride.fit").await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "my+rides/long%20ride.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Ok);
    let puts = harness.storage.recorded_puts().await;
    assert_eq!(puts[0].key, "converted/long ride.csv");
}

#[tokio::test]
async fn test_empty_event_is_error() {
    let harness = TestHarness::new();

    let outcome = harness.pipeline.handle_event(&S3Event::default()).await;

    assert_eq!(outcome, PipelineOutcome::Error);
    assert_eq!(harness.storage.call_count(StorageOp::Get).await, 0);
}

#[tokio::test]
async fn test_missing_object_fails_at_download() {
    let harness = TestHarness::new();

    let event = fixtures::s3_event("b", "rides/404.fit")
        .conversion_events(RecordSelection::FirstOnly)
        .unwrap();
    let err = harness.pipeline.process(&event[0]).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Downloaded);
    assert!(matches!(
        err,
        PipelineError::Storage {
            source: StorageError::NotFound { .. },
            ..
        }
    ));
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert!(harness.storage.recorded_puts().await.is_empty());
}

#[tokio::test]
async fn test_metadata_failure_skips_conversion() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    harness
        .storage
        .set_next_error(
            StorageOp::Metadata,
            StorageError::MetadataFailed("access denied".to_string()),
        )
        .await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/123.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Error);
    assert_eq!(harness.converter.conversion_count().await, 0);
    assert!(harness.storage.recorded_puts().await.is_empty());
}

#[tokio::test]
async fn test_conversion_failure_skips_upload() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    harness
        .converter
        .set_next_error(ConverterError::conversion_failed(
            "Converter exited with status 1",
            vec!["FIT decode error".to_string()],
        ))
        .await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/123.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Error);
    assert_eq!(harness.storage.call_count(StorageOp::Put).await, 0);
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected_without_upload() {
    let harness = TestHarness::new();
    harness.seed("rides/123.gpx").await;

    let event = fixtures::s3_event("b", "rides/123.gpx")
        .conversion_events(RecordSelection::FirstOnly)
        .unwrap();
    let err = harness.pipeline.process(&event[0]).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Converted);
    assert!(harness.storage.recorded_puts().await.is_empty());
}

#[tokio::test]
async fn test_malformed_name_is_rejected_without_upload() {
    let harness = TestHarness::new();
    harness.seed("rides/123.v2.fit").await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/123.v2.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Error);
    assert!(harness.storage.recorded_puts().await.is_empty());
}

#[tokio::test]
async fn test_upload_failure_is_error() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    harness
        .storage
        .set_next_error(
            StorageOp::Put,
            StorageError::UploadFailed("bucket is read-only".to_string()),
        )
        .await;

    let event = fixtures::s3_event("b", "rides/123.fit")
        .conversion_events(RecordSelection::FirstOnly)
        .unwrap();
    let err = harness.pipeline.process(&event[0]).await.unwrap_err();

    assert_eq!(err.stage(), PipelineStage::Uploaded);
    assert_eq!(harness.converter.conversion_count().await, 1);
    assert!(harness.storage.recorded_puts().await.is_empty());
}

#[tokio::test]
async fn test_first_only_ignores_extra_records() {
    let harness = TestHarness::new();
    harness.seed("rides/1.fit").await;
    harness.seed("rides/2.fit").await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event_with_keys("b", &["rides/1.fit", "rides/2.fit"]))
        .await;

    assert_eq!(outcome, PipelineOutcome::Ok);
    let puts = harness.storage.recorded_puts().await;
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].key, "converted/1.csv");
}

#[tokio::test]
async fn test_all_records_attempts_every_record() {
    let harness = TestHarness::with_selection(RecordSelection::All);
    harness.seed("rides/1.fit").await;
    harness.seed("rides/3.csv").await;

    // Middle record is missing; the others still go through
    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event_with_keys(
            "b",
            &["rides/1.fit", "rides/2.fit", "rides/3.csv"],
        ))
        .await;

    assert_eq!(outcome, PipelineOutcome::Error);
    let keys: Vec<String> = harness
        .storage
        .recorded_puts()
        .await
        .into_iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(keys, vec!["converted/1.csv", "fixed/3.fit"]);
}

#[tokio::test]
async fn test_scratch_is_empty_after_each_run() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    harness.seed("edited/123.csv").await;

    for key in ["rides/123.fit", "edited/123.csv"] {
        let outcome = harness.pipeline.handle_event(&fixtures::s3_event("b", key)).await;
        assert_eq!(outcome, PipelineOutcome::Ok);
        assert!(harness.scratch_entries().is_empty(), "scratch not empty after {key}");
    }
}

#[tokio::test]
async fn test_scratch_is_empty_after_failed_run() {
    let harness = TestHarness::new();
    harness.seed("rides/123.fit").await;
    harness
        .storage
        .set_next_error(
            StorageOp::Put,
            StorageError::UploadFailed("bucket is read-only".to_string()),
        )
        .await;

    let outcome = harness
        .pipeline
        .handle_event(&fixtures::s3_event("b", "rides/123.fit"))
        .await;

    assert_eq!(outcome, PipelineOutcome::Error);
    // Conversion ran, so both the input and the output had been written
    assert_eq!(harness.converter.conversion_count().await, 1);
    assert!(harness.scratch_entries().is_empty());
}

#[cfg(unix)]
/// Body that deletes the file being written to as soon as it is first read.
struct VanishingBody {
    target: PathBuf,
}

#[cfg(unix)]
impl AsyncRead for VanishingBody {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let _ = std::fs::remove_file(&self.target);
        Poll::Ready(Ok(()))
    }
}

#[cfg(unix)]
/// Storage whose object bodies remove the local download while it is written.
struct VanishingStorage {
    scratch_dir: PathBuf,
}

#[cfg(unix)]
#[async_trait]
impl ObjectStorage for VanishingStorage {
    fn backend_name(&self) -> &str {
        "vanishing"
    }

    async fn get_object_stream(&self, _bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        let name = Path::new(key).file_name().unwrap();
        Ok(Box::pin(VanishingBody {
            target: self.scratch_dir.join(name),
        }))
    }

    async fn get_metadata(&self, _bucket: &str, _key: &str) -> StorageResult<UserMetadata> {
        Ok(UserMetadata::new())
    }

    async fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _local_path: &Path,
        _metadata: &UserMetadata,
    ) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_missing_download_fails_verification() {
    let scratch_dir = TempDir::new().unwrap();
    let converter = MockConverter::new(scratch_dir.path());
    let pipeline = ConversionPipeline::new(
        PipelineConfig::default().with_scratch_dir(scratch_dir.path().to_path_buf()),
        Arc::new(VanishingStorage {
            scratch_dir: scratch_dir.path().to_path_buf(),
        }),
        Arc::new(converter.clone()),
    );

    let event = fixtures::s3_event("b", "rides/123.fit")
        .conversion_events(RecordSelection::FirstOnly)
        .unwrap();
    let err = pipeline.process(&event[0]).await.unwrap_err();

    assert!(matches!(err, PipelineError::DownloadVerificationFailed { .. }));
    assert_eq!(err.stage(), PipelineStage::Downloaded);
    assert_eq!(converter.conversion_count().await, 0);
}
