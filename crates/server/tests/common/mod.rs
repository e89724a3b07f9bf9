//! Common test utilities for in-process server testing with mocks.
//!
//! This module provides a test fixture that builds the router with mock
//! storage and converter injected, so requests run the full pipeline
//! without S3 or a JVM.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use fitconv_core::{
    testing::{MockConverter, MockStorage},
    ConversionPipeline, PipelineConfig, RecordSelection,
};
use fitconv_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use fitconv_core::testing::fixtures;

/// Test fixture with controllable mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_event_delivery() {
///     let fixture = TestFixture::new();
///     fixture.storage.insert_object("b", "rides/1.fit", body, meta).await;
///
///     let response = fixture.post_json("/api/v1/events", &event).await;
///     assert_eq!(response.body, "OK");
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock storage - seed objects, inspect uploads
    pub storage: MockStorage,
    /// Mock converter - inject failures
    pub converter: MockConverter,
    /// Scratch directory for downloaded and converted files
    pub scratch_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestFixture {
    /// Create a new test fixture processing only the first record.
    pub fn new() -> Self {
        Self::with_selection(RecordSelection::FirstOnly)
    }

    /// Create a test fixture with the given record selection.
    pub fn with_selection(selection: RecordSelection) -> Self {
        let scratch_dir = TempDir::new().expect("Failed to create scratch dir");
        let storage = MockStorage::new();
        let converter = MockConverter::new(scratch_dir.path());

        let config = PipelineConfig::default()
            .with_scratch_dir(scratch_dir.path().to_path_buf())
            .with_record_selection(selection);
        let pipeline = ConversionPipeline::new(
            config,
            Arc::new(storage.clone()),
            Arc::new(converter.clone()),
        );

        let router = create_router(Arc::new(AppState::new(pipeline)));

        Self {
            router,
            storage,
            converter,
            scratch_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with a serializable JSON body.
    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> TestResponse {
        let body = serde_json::to_string(body).expect("Failed to serialize body");
        self.post_raw(path, &body).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }
}
