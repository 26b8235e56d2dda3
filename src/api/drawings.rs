//! Drawings REST API
//!
//! | Method | Path                | Success                          |
//! |--------|---------------------|----------------------------------|
//! | POST   | `/api/drawings`     | 201 + stored drawing             |
//! | GET    | `/api/drawings`     | 200 + every drawing              |
//! | GET    | `/api/drawings/:id` | 200 + drawing                    |
//! | PUT    | `/api/drawings/:id` | 200 + updated drawing            |
//! | DELETE | `/api/drawings/:id` | 200 + `{message}` acknowledgment |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use whiteboard_core::{Drawing, DrawingController, MessageBody};

use super::error::ApiError;

/// Shared state for the drawings routes
#[derive(Clone)]
pub struct DrawingsState {
    pub controller: Arc<DrawingController>,
}

impl DrawingsState {
    pub fn new(controller: Arc<DrawingController>) -> Self {
        Self { controller }
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn create_drawing(
    State(state): State<DrawingsState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Drawing>)> {
    let Json(payload) = payload?;
    let drawing = state.controller.create(payload).await?;
    Ok((StatusCode::CREATED, Json(drawing)))
}

async fn list_drawings(State(state): State<DrawingsState>) -> ApiResult<Json<Vec<Drawing>>> {
    Ok(Json(state.controller.list_all().await?))
}

async fn get_drawing(
    State(state): State<DrawingsState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Drawing>> {
    Ok(Json(state.controller.get_by_id(&id).await?))
}

async fn update_drawing(
    State(state): State<DrawingsState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Drawing>> {
    let Json(payload) = payload?;
    Ok(Json(state.controller.update_by_id(&id, payload).await?))
}

async fn delete_drawing(
    State(state): State<DrawingsState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    Ok(Json(state.controller.delete_by_id(&id).await?))
}

/// Create drawings routes
pub fn drawings_routes(controller: Arc<DrawingController>) -> Router {
    Router::new()
        .route("/api/drawings", get(list_drawings).post(create_drawing))
        .route(
            "/api/drawings/:id",
            get(get_drawing).put(update_drawing).delete(delete_drawing),
        )
        .with_state(DrawingsState::new(controller))
}
