//! Drawings API client
//!
//! Thin reqwest wrapper over the `/api/drawings` routes. Error responses carry
//! a `{ "message": ... }` body, which is surfaced as [`Error::Api`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use whiteboard_core::{Drawing, DrawingId, DrawingPatch, MessageBody, NewDrawing};

use crate::error::{Error, Result};

/// Environment variable naming the API base URL
pub const BACKEND_URL_ENV: &str = "WHITEBOARD_BACKEND_URL";

/// Base URL used when [`BACKEND_URL_ENV`] is unset
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";

/// Client settings
///
/// Requests carry no timeout and are never retried; a call waits until the
/// server answers or the connection fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, e.g. `http://localhost:5000/api`
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read the base URL from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        Self { base_url }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the drawings API
#[derive(Clone)]
pub struct DrawingsClient {
    http: reqwest::Client,
    base_url: String,
}

impl DrawingsClient {
    /// Create a client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("whiteboard-canvas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// API base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/drawings", self.base_url)
    }

    fn item_url(&self, id: &DrawingId) -> String {
        format!("{}/drawings/{}", self.base_url, id)
    }

    /// Fetch every drawing
    pub async fn list(&self) -> Result<Vec<Drawing>> {
        let resp = self.http.get(self.collection_url()).send().await?;
        decode(resp).await
    }

    /// Fetch one drawing
    pub async fn get(&self, id: &DrawingId) -> Result<Drawing> {
        let resp = self.http.get(self.item_url(id)).send().await?;
        decode(resp).await
    }

    /// Save a new drawing
    pub async fn create(&self, drawing: &NewDrawing) -> Result<Drawing> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(drawing)
            .send()
            .await?;
        decode(resp).await
    }

    /// Patch an existing drawing
    pub async fn update(&self, id: &DrawingId, patch: &DrawingPatch) -> Result<Drawing> {
        let resp = self
            .http
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await?;
        decode(resp).await
    }

    /// Delete a drawing, returning the server's acknowledgment
    pub async fn delete(&self, id: &DrawingId) -> Result<String> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        let body: MessageBody = decode(resp).await?;
        Ok(body.message)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json()
            .await
            .map_err(|e| Error::Decode(format!("Invalid response body: {e}")));
    }

    let text = resp.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %text, "API error response");
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({ "base_url": "http://localhost:5000/api" })
        );
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = DrawingsClient::new(ClientConfig {
            base_url: "http://example.test/api/".to_string(),
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://example.test/api");
        assert_eq!(client.collection_url(), "http://example.test/api/drawings");
        assert_eq!(
            client.item_url(&DrawingId::nil()),
            "http://example.test/api/drawings/00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DrawingsClient::new(ClientConfig {
            base_url: format!("http://{addr}/api"),
        })
        .unwrap();
        let err = client.list().await.unwrap_err();
        assert_eq!(err.code(), "network_error");
    }
}
