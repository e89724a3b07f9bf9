use tokio::sync::Mutex;

use fitconv_core::{ConversionPipeline, PipelineOutcome, S3Event};

/// Shared application state
pub struct AppState {
    /// Held for the whole run so one event finishes before the next starts.
    pipeline: Mutex<ConversionPipeline>,
}

impl AppState {
    pub fn new(pipeline: ConversionPipeline) -> Self {
        Self {
            pipeline: Mutex::new(pipeline),
        }
    }

    /// Handles an event once every earlier event has finished.
    pub async fn run_exclusive(&self, event: &S3Event) -> PipelineOutcome {
        let pipeline = self.pipeline.lock().await;
        pipeline.handle_event(event).await
    }
}
