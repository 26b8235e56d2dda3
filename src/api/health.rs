//! Health check endpoint
//!
//! `/health` reports the version and whether the drawing store answers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use whiteboard_core::DrawingController;

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

async fn health_check(
    State(controller): State<Arc<DrawingController>>,
) -> (StatusCode, Json<HealthResponse>) {
    match controller.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("healthy"))),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("degraded")),
        ),
    }
}

/// Create health routes
pub fn health_routes(controller: Arc<DrawingController>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(controller)
}
