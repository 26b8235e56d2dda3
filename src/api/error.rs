//! API error responses
//!
//! Every failure leaves the server as `{ "message": ... }` with the status the
//! error maps to.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::warn;
use whiteboard_core::MessageBody;

/// Error returned from API handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Generic 500 used when a handler panics
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// 404 for paths no route matches
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Route not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}

impl From<whiteboard_core::Error> for ApiError {
    fn from(err: whiteboard_core::Error) -> Self {
        if matches!(err, whiteboard_core::Error::Query(_)) {
            warn!(code = err.code(), error = %err, "Drawing store failure");
        }
        let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}
