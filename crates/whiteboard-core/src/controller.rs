//! Drawing Resource Controller
//!
//! Maps the create/list/get/update/delete verbs onto a [`DrawingStore`].
//! Payloads arrive as loose JSON and ids as raw path segments; both are
//! validated here so that every failure carries one of the error variants
//! in [`crate::error`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::drawing::{Drawing, DrawingId, DrawingPatch, NewDrawing};
use crate::error::{Error, Result};
use crate::store::DrawingStore;

/// Acknowledgment returned by a successful delete
pub const DELETED_MESSAGE: &str = "Drawing deleted successfully";

/// Message-only response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message
    pub message: String,
}

impl MessageBody {
    /// Create a message body
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CRUD controller over drawings
#[derive(Clone)]
pub struct DrawingController {
    store: Arc<dyn DrawingStore>,
}

impl DrawingController {
    /// Create a controller backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn DrawingStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new drawing
    pub async fn create(&self, payload: serde_json::Value) -> Result<Drawing> {
        let content = NewDrawing::from_payload(payload)?;
        let drawing = Drawing::new(Uuid::new_v4(), content);

        self.store.insert(&drawing).await?;
        info!(
            id = %drawing.id,
            lines = drawing.lines.len(),
            shapes = drawing.shapes.len(),
            "Drawing created"
        );
        Ok(drawing)
    }

    /// Every stored drawing
    pub async fn list_all(&self) -> Result<Vec<Drawing>> {
        let drawings = self.store.list().await?;
        debug!(count = drawings.len(), "Listed drawings");
        Ok(drawings)
    }

    /// One drawing by id
    pub async fn get_by_id(&self, id: &str) -> Result<Drawing> {
        let id = parse_id(id)?;
        self.store.get(id).await?.ok_or(Error::NotFound(id))
    }

    /// Merge `payload` into the stored drawing
    pub async fn update_by_id(&self, id: &str, payload: serde_json::Value) -> Result<Drawing> {
        let id = parse_id(id)?;
        let patch = DrawingPatch::from_payload(payload)?;

        let drawing = self
            .store
            .update(id, patch)
            .await?
            .ok_or(Error::NotFound(id))?;
        info!(id = %id, "Drawing updated");
        Ok(drawing)
    }

    /// Remove a drawing
    pub async fn delete_by_id(&self, id: &str) -> Result<MessageBody> {
        let id = parse_id(id)?;
        if !self.store.delete(id).await? {
            return Err(Error::NotFound(id));
        }
        info!(id = %id, "Drawing deleted");
        Ok(MessageBody::new(DELETED_MESSAGE))
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await.inspect_err(|e| {
            warn!(error = %e, "Drawing store ping failed");
        })
    }
}

/// Parse a raw path segment into a drawing id
pub fn parse_id(raw: &str) -> Result<DrawingId> {
    Uuid::parse_str(raw).map_err(|_| Error::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Color, Point, Shape};
    use crate::store::{MockDrawingStore, SqliteDrawingStore};
    use serde_json::json;

    async fn setup_controller() -> DrawingController {
        let store = SqliteDrawingStore::connect("sqlite::memory:", 1)
            .await
            .unwrap();
        DrawingController::new(Arc::new(store))
    }

    fn rectangle_payload() -> serde_json::Value {
        json!({
            "lines": [],
            "shapes": [
                {"type": "rectangle", "x": 0, "y": 0, "width": 50, "height": 50, "color": "#ff0000"}
            ],
            "texts": []
        })
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_content() {
        let controller = setup_controller().await;

        let created = controller.create(rectangle_payload()).await.unwrap();
        let fetched = controller.get_by_id(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(
            fetched.shapes,
            vec![Shape::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 50.0,
                height: 50.0,
                color: Color::new("#ff0000"),
            }]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_payload() {
        let controller = setup_controller().await;

        let err = controller.create(json!([1, 2, 3])).await.unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.status_code(), 400);

        assert!(controller.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_returns_each_created_once() {
        let controller = setup_controller().await;

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(controller.create(json!({})).await.unwrap().id);
        }

        let listed: Vec<_> = controller
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_get_with_malformed_id() {
        let controller = setup_controller().await;
        let err = controller.get_by_id("not-a-uuid").await.unwrap_err();
        assert_eq!(err.code(), "invalid_id");
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let controller = setup_controller().await;
        let err = controller
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Drawing not found");
    }

    #[tokio::test]
    async fn test_update_replaces_only_given_fields() {
        let controller = setup_controller().await;
        let created = controller
            .create(json!({
                "name": "board",
                "lines": [{
                    "start": {"x": 1, "y": 1},
                    "end": {"x": 2, "y": 2},
                    "color": "#000000",
                    "lineWidth": 4
                }]
            }))
            .await
            .unwrap();
        let id = created.id.to_string();

        let shapes = vec![Shape::circle(
            Point::new(10.0, 10.0),
            Point::new(13.0, 14.0),
            Color::new("blue"),
        )];
        controller
            .update_by_id(&id, json!({ "shapes": shapes }))
            .await
            .unwrap();

        let fetched = controller.get_by_id(&id).await.unwrap();
        assert_eq!(fetched.shapes, shapes);
        assert_eq!(fetched.lines, created.lines);
        assert_eq!(fetched.name.as_deref(), Some("board"));
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let controller = setup_controller().await;
        let err = controller
            .update_by_id(&Uuid::new_v4().to_string(), json!({"shapes": []}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_payload() {
        let controller = setup_controller().await;
        let created = controller.create(json!({})).await.unwrap();
        let err = controller
            .update_by_id(&created.id.to_string(), json!({"shapes": 7}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let controller = setup_controller().await;
        let id = controller.create(json!({})).await.unwrap().id.to_string();

        let ack = controller.delete_by_id(&id).await.unwrap();
        assert_eq!(ack.message, DELETED_MESSAGE);

        let err = controller.delete_by_id(&id).await.unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = controller.get_by_id(&id).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_query_error() {
        let mut store = MockDrawingStore::new();
        store
            .expect_list()
            .returning(|| Err(Error::query("connection refused")));
        store
            .expect_ping()
            .returning(|| Err(Error::query("connection refused")));

        let controller = DrawingController::new(Arc::new(store));

        let err = controller.list_all().await.unwrap_err();
        assert_eq!(err.code(), "query_error");
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("connection refused"));

        assert!(controller.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_store() {
        let store = MockDrawingStore::new();
        let controller = DrawingController::new(Arc::new(store));

        let err = controller.delete_by_id("1234").await.unwrap_err();
        assert_eq!(err.code(), "invalid_id");
    }
}
