//! Whiteboard Core
//!
//! This crate provides the backend side of the whiteboard:
//! - Drawing: the persisted document and its line/shape/text types
//! - Store: document storage behind the `DrawingStore` trait (SQLite)
//! - Controller: create/list/get/update/delete over the store
//! - Error: the error taxonomy and its HTTP status mapping
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use whiteboard_core::{DrawingController, SqliteDrawingStore};
//!
//! let store = SqliteDrawingStore::connect("sqlite://whiteboard.db?mode=rwc", 5).await?;
//! let controller = DrawingController::new(Arc::new(store));
//!
//! let drawing = controller.create(serde_json::json!({ "shapes": [] })).await?;
//! let same = controller.get_by_id(&drawing.id.to_string()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod drawing;
pub mod error;
pub mod store;

// Re-export main types
pub use controller::{parse_id, DrawingController, MessageBody, DELETED_MESSAGE};
pub use drawing::{
    Color, Drawing, DrawingId, DrawingPatch, Line, NewDrawing, Point, Shape, TextAnnotation,
};
pub use error::{Error, Result};
pub use store::{is_in_memory, DrawingStore, SqliteDrawingStore};
