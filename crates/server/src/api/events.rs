//! Bucket-notification delivery endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode};
use std::sync::Arc;
use tracing::warn;

use fitconv_core::{PipelineOutcome, S3Event};

use crate::state::AppState;

/// Runs one notification through the pipeline and answers with `OK` or `Error`.
///
/// A body that is not a bucket notification is rejected with 400 before the
/// pipeline is touched; a failed run answers 500.
pub async fn handle_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let event = match S3Event::from_json(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Rejected malformed event body");
            return (StatusCode::BAD_REQUEST, PipelineOutcome::Error.as_str());
        }
    };

    let outcome = state.run_exclusive(&event).await;
    let status = if outcome.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, outcome.as_str())
}
