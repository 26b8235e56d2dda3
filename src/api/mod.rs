//! Web API module for Whiteboard
//!
//! Provides REST API endpoints for:
//! - Drawing CRUD under `/api/drawings`
//! - Health checks

pub mod drawings;
pub mod error;
pub mod health;

use std::sync::Arc;

use axum::Router;
use whiteboard_core::DrawingController;

pub use drawings::drawings_routes;
pub use error::ApiError;
pub use health::health_routes;

/// Create the API router with all endpoints
pub fn api_router(controller: Arc<DrawingController>) -> Router {
    Router::new()
        .merge(health_routes(controller.clone()))
        .merge(drawings_routes(controller))
}

/// Fallback for unmatched paths when no frontend is served
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
