use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{events, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/events", post(events::handle_event))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
