//! Error types for whiteboard-core
//!
//! Every failure the resource controller can report, with the HTTP status
//! each one surfaces as.

use thiserror::Error;
use uuid::Uuid;

/// Drawing error type
#[derive(Debug, Error)]
pub enum Error {
    /// Payload does not have the drawing shape
    #[error("validation failed: {0}")]
    Validation(String),

    /// No drawing with this id
    #[error("Drawing not found")]
    NotFound(Uuid),

    /// Id is not in the store's identifier format
    #[error("invalid drawing id: {0:?}")]
    InvalidId(String),

    /// Store unreachable or failed internally
    #[error("query failed: {0}")]
    Query(String),
}

impl Error {
    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a query error
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Get error code for logs and clients
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::InvalidId(_) => "invalid_id",
            Self::Query(_) => "query_error",
        }
    }

    /// HTTP status this error surfaces as
    ///
    /// Only a missing drawing gets its own status; every other failure is a
    /// client error carrying the underlying message.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::InvalidId(_) | Self::Query(_) => 400,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Query(err.to_string())
    }
}

/// Result type alias for drawing operations
pub type Result<T> = std::result::Result<T, Error>;
