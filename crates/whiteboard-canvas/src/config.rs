//! Canvas configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use whiteboard_core::Color;

/// Editor and surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Surface width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Surface height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Maximum undo (and redo) depth; the oldest operation is evicted first
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Pixel size of text glyphs
    #[serde(default = "default_text_size")]
    pub text_size: f32,
    /// Stroke width for rectangle and circle outlines
    #[serde(default = "default_line_width")]
    pub shape_line_width: f64,
    /// Initial stroke color
    #[serde(default)]
    pub default_color: Color,
    /// Initial freehand width
    #[serde(default = "default_line_width")]
    pub default_line_width: f64,
    /// TrueType/OpenType font used for text; the bundled DejaVu Sans when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_history_limit() -> usize {
    100
}

fn default_text_size() -> f32 {
    20.0
}

fn default_line_width() -> f64 {
    4.0
}

/// Smallest freehand width the width control allows
pub const MIN_LINE_WIDTH: f64 = 1.0;

/// Largest freehand width the width control allows
pub const MAX_LINE_WIDTH: f64 = 10.0;

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            history_limit: default_history_limit(),
            text_size: default_text_size(),
            shape_line_width: default_line_width(),
            default_color: Color::default(),
            default_line_width: default_line_width(),
            font_path: None,
        }
    }
}

impl CanvasConfig {
    /// Set the surface size
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the history depth
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the font used for text shapes
    #[must_use]
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }
}
