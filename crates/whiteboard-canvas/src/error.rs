//! Error types for whiteboard-canvas
//!
//! Client-side failures: transport errors talking to the drawings API, error
//! responses from it, and surface/font problems in the renderer.

use thiserror::Error;

/// Canvas error type
#[derive(Debug, Error)]
pub enum Error {
    /// Request never completed
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with an error status
    #[error("server responded {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// Response body did not decode
    #[error("decode error: {0}")]
    Decode(String),

    /// Surface could not be created or exported
    #[error("rendering error: {0}")]
    Rendering(String),

    /// Font could not be loaded
    #[error("font error: {0}")]
    Font(String),
}

impl Error {
    /// Create a network error
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a rendering error
    #[must_use]
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    /// Create a font error
    #[must_use]
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Get error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::Api { .. } => "api_error",
            Self::Decode(_) => "decode_error",
            Self::Rendering(_) => "rendering_error",
            Self::Font(_) => "font_error",
        }
    }

    /// HTTP status of an API error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;
