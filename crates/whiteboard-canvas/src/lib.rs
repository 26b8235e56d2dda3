//! Whiteboard Canvas - Editor Side
//!
//! This crate provides the client side of the whiteboard:
//! - State: the editable canvas content, tools and reducer-style actions
//! - History: bounded undo/redo over structured operations
//! - Renderer: tiny-skia raster surface, shape outlines and text glyphs
//! - Client: typed access to the drawings REST API
//! - Session: the editor controller tying state, surface and client together
//! - Error: Error types for canvas operations
//!
//! ## Usage
//!
//! ```ignore
//! use whiteboard_canvas::{
//!     CanvasAction, CanvasConfig, DrawingsClient, Mode, Whiteboard,
//! };
//! use whiteboard_core::Point;
//!
//! let mut board = Whiteboard::new(&CanvasConfig::default(), DrawingsClient::from_env()?)?;
//! board.dispatch(CanvasAction::SetMode(Mode::Circle));
//! board.dispatch(CanvasAction::PointerDown(Point::new(10.0, 10.0)));
//! board.dispatch(CanvasAction::PointerUp(Point::new(13.0, 14.0)));
//! board.save().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod renderer;
pub mod session;
pub mod state;

// Re-export main types
pub use client::{ClientConfig, DrawingsClient, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
pub use color::{parse_rgba, to_paint_color};
pub use config::{CanvasConfig, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
pub use error::{Error, Result};
pub use history::{History, Operation};
pub use renderer::{Renderer, Scene, Surface};
pub use session::Whiteboard;
pub use state::{CanvasAction, CanvasState, Effect, Mode};
