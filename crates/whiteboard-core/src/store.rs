//! Drawing Store
//!
//! Document storage for drawings. Each drawing is kept as one JSON document
//! keyed by its id; the SQLite implementation stores the document text in a
//! single column and lists rows in insertion order.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::debug;

use crate::drawing::{Drawing, DrawingId, DrawingPatch};
use crate::error::{Error, Result};

/// Persistence seam for the resource controller
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrawingStore: Send + Sync {
    /// Persist a new drawing
    async fn insert(&self, drawing: &Drawing) -> Result<()>;

    /// All drawings in insertion order
    async fn list(&self) -> Result<Vec<Drawing>>;

    /// Fetch one drawing
    async fn get(&self, id: DrawingId) -> Result<Option<Drawing>>;

    /// Merge a patch into a stored drawing, returning the updated document
    async fn update(&self, id: DrawingId, patch: DrawingPatch) -> Result<Option<Drawing>>;

    /// Remove a drawing; `false` when nothing was deleted
    async fn delete(&self, id: DrawingId) -> Result<bool>;

    /// Check that the backing database answers
    async fn ping(&self) -> Result<()>;
}

/// SQLite-based drawing store
pub struct SqliteDrawingStore {
    pool: SqlitePool,
}

impl SqliteDrawingStore {
    /// Create a new store with the given database pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` and initialize the schema
    ///
    /// In-memory databases exist per connection, so they are pinned to a
    /// single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = options.connect(url).await?;
        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Initialize the database schema
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drawings (
                id TEXT PRIMARY KEY,
                document_json TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Underlying pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether a connection string points at a private in-memory database
#[must_use]
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn decode_document(id: &str, document_json: &str) -> Result<Drawing> {
    serde_json::from_str(document_json)
        .map_err(|e| Error::query(format!("stored drawing {} is corrupt: {}", id, e)))
}

#[async_trait]
impl DrawingStore for SqliteDrawingStore {
    async fn insert(&self, drawing: &Drawing) -> Result<()> {
        let document_json = serde_json::to_string(drawing)?;

        sqlx::query(
            r#"
            INSERT INTO drawings (id, document_json)
            VALUES (?, ?)
            "#,
        )
        .bind(drawing.id.to_string())
        .bind(&document_json)
        .execute(&self.pool)
        .await?;

        debug!(id = %drawing.id, "drawing inserted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Drawing>> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_json
            FROM drawings
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let document_json: String = row.get("document_json");
                decode_document(&id, &document_json)
            })
            .collect()
    }

    async fn get(&self, id: DrawingId) -> Result<Option<Drawing>> {
        let row = sqlx::query(
            r#"
            SELECT document_json FROM drawings WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let document_json: String = row.get("document_json");
                decode_document(&id.to_string(), &document_json).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: DrawingId, patch: DrawingPatch) -> Result<Option<Drawing>> {
        // Take the write lock up front so concurrent updates queue on the
        // busy timeout instead of failing the read-to-write lock upgrade.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let row = sqlx::query(
            r#"
            SELECT document_json FROM drawings WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let document_json: String = row.get("document_json");
        let mut drawing = decode_document(&id.to_string(), &document_json)?;
        drawing.apply(patch);

        sqlx::query(
            r#"
            UPDATE drawings SET document_json = ? WHERE id = ?
            "#,
        )
        .bind(serde_json::to_string(&drawing)?)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %id, "drawing updated");
        Ok(Some(drawing))
    }

    async fn delete(&self, id: DrawingId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM drawings WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Color, NewDrawing, Point, Shape};
    use uuid::Uuid;

    async fn setup_test_db() -> SqliteDrawingStore {
        SqliteDrawingStore::connect("sqlite::memory:", 1)
            .await
            .unwrap()
    }

    fn drawing_with_circle() -> Drawing {
        Drawing::new(
            Uuid::new_v4(),
            NewDrawing {
                shapes: vec![Shape::circle(
                    Point::new(0.0, 0.0),
                    Point::new(3.0, 4.0),
                    Color::new("green"),
                )],
                ..NewDrawing::default()
            },
        )
    }

    #[tokio::test]
    async fn test_store_init_is_idempotent() {
        let store = setup_test_db().await;
        store.init().await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = setup_test_db().await;
        let drawing = drawing_with_circle();

        store.insert(&drawing).await.unwrap();

        let loaded = store.get(drawing.id).await.unwrap();
        assert_eq!(loaded, Some(drawing));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = setup_test_db().await;
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_query_error() {
        let store = setup_test_db().await;
        let drawing = drawing_with_circle();

        store.insert(&drawing).await.unwrap();
        let err = store.insert(&drawing).await.unwrap_err();
        assert_eq!(err.code(), "query_error");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = setup_test_db().await;
        let mut ids = Vec::new();
        for _ in 0..5 {
            let drawing = drawing_with_circle();
            ids.push(drawing.id);
            store.insert(&drawing).await.unwrap();
        }

        let listed: Vec<_> = store.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let store = setup_test_db().await;
        let drawing = drawing_with_circle();
        store.insert(&drawing).await.unwrap();

        let updated = store
            .update(
                drawing.id,
                DrawingPatch {
                    name: Some("renamed".to_string()),
                    ..DrawingPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("renamed"));
        assert_eq!(updated.shapes, drawing.shapes);
        assert_eq!(store.get(drawing.id).await.unwrap(), Some(updated));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_last_writer_wins() {
        let path = std::env::temp_dir().join(format!("whiteboard-{}.db", Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let store = std::sync::Arc::new(SqliteDrawingStore::connect(&url, 5).await.unwrap());
        let drawing = drawing_with_circle();
        store.insert(&drawing).await.unwrap();
        let id = drawing.id;

        let tasks: Vec<_> = (0..40)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .update(
                            id,
                            DrawingPatch {
                                name: Some(format!("edit {i}")),
                                ..DrawingPatch::default()
                            },
                        )
                        .await
                })
            })
            .collect();

        let mut names = Vec::new();
        for task in tasks {
            let updated = task.await.unwrap().unwrap().unwrap();
            names.push(updated.name.unwrap());
        }

        let stored = store.get(id).await.unwrap().unwrap();
        assert!(names.contains(stored.name.as_ref().unwrap()));
        assert_eq!(stored.shapes, drawing.shapes);

        store.pool().close().await;
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = setup_test_db().await;
        let result = store
            .update(Uuid::new_v4(), DrawingPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = setup_test_db().await;
        let drawing = drawing_with_circle();
        store.insert(&drawing).await.unwrap();

        assert!(store.delete(drawing.id).await.unwrap());
        assert!(!store.delete(drawing.id).await.unwrap());
        assert!(store.get(drawing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_query_error() {
        let store = setup_test_db().await;
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO drawings (id, document_json) VALUES (?, ?)")
            .bind(id.to_string())
            .bind("{not json")
            .execute(store.pool())
            .await
            .unwrap();

        let err = store.get(id).await.unwrap_err();
        assert_eq!(err.code(), "query_error");
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://whiteboard.db?mode=rwc"));
    }
}
