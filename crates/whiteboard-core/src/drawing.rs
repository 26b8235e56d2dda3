//! Drawing Document Types
//!
//! A drawing is the persisted unit of work: an ordered list of freehand line
//! segments, an ordered list of shapes, and a list of text annotations.
//! Insertion order is draw order, so both lists are rendered front to back.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Identifier assigned to a drawing by the store
pub type DrawingId = Uuid;

/// A point in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge
    pub x: f64,
    /// Vertical offset from the top edge
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A color value, stored exactly as the client sent it
///
/// No palette is enforced; parsing happens only at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a color string
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw color string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("#000000")
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single freehand segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Segment start
    pub start: Point,
    /// Segment end
    pub end: Point,
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub line_width: f64,
}

/// Shape variants committed by the shape tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Rectangle outline; width and height keep the sign of the drag
    Rectangle {
        /// Anchor x
        x: f64,
        /// Anchor y
        y: f64,
        /// Signed horizontal extent
        width: f64,
        /// Signed vertical extent
        height: f64,
        /// Stroke color
        color: Color,
    },

    /// Circle outline centered on the anchor
    Circle {
        /// Center x
        x: f64,
        /// Center y
        y: f64,
        /// Radius, never negative
        radius: f64,
        /// Stroke color
        color: Color,
    },

    /// Text placed with its baseline at `(x, y)`
    Text {
        /// Baseline x
        x: f64,
        /// Baseline y
        y: f64,
        /// Free-form text
        text: String,
        /// Fill color
        color: Color,
    },
}

impl Shape {
    /// Rectangle spanned from `anchor` to `release`
    #[must_use]
    pub fn rectangle(anchor: Point, release: Point, color: Color) -> Self {
        Self::Rectangle {
            x: anchor.x,
            y: anchor.y,
            width: release.x - anchor.x,
            height: release.y - anchor.y,
            color,
        }
    }

    /// Circle centered on `anchor` passing through `release`
    #[must_use]
    pub fn circle(anchor: Point, release: Point, color: Color) -> Self {
        Self::Circle {
            x: anchor.x,
            y: anchor.y,
            radius: anchor.distance_to(release),
            color,
        }
    }

    /// Text placed at `at`
    #[must_use]
    pub fn text(at: Point, text: impl Into<String>, color: Color) -> Self {
        Self::Text {
            x: at.x,
            y: at.y,
            text: text.into(),
            color,
        }
    }

    /// Color of the shape
    #[must_use]
    pub fn color(&self) -> &Color {
        match self {
            Self::Rectangle { color, .. } | Self::Circle { color, .. } | Self::Text { color, .. } => {
                color
            }
        }
    }

    /// Variant name as it appears in the `type` tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }
}

/// Standalone text annotation
///
/// Kept in the document for forward compatibility. The editor folds text into
/// [`Shape::Text`] and the renderer does not paint these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Baseline x
    pub x: f64,
    /// Baseline y
    pub y: f64,
    /// Annotation text
    pub text: String,
    /// Fill color
    pub color: Color,
}

/// A stored drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Store-assigned identifier
    pub id: DrawingId,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Freehand segments in draw order
    #[serde(default)]
    pub lines: Vec<Line>,

    /// Shapes in draw order
    #[serde(default)]
    pub shapes: Vec<Shape>,

    /// Text annotations
    #[serde(default)]
    pub texts: Vec<TextAnnotation>,
}

impl Drawing {
    /// Build a stored drawing from a creation payload
    #[must_use]
    pub fn new(id: DrawingId, content: NewDrawing) -> Self {
        Self {
            id,
            name: content.name,
            lines: content.lines,
            shapes: content.shapes,
            texts: content.texts,
        }
    }

    /// Merge a patch into this drawing
    ///
    /// Fields present in the patch replace the stored field wholesale; absent
    /// fields are left untouched. The id never changes.
    pub fn apply(&mut self, patch: DrawingPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(lines) = patch.lines {
            self.lines = lines;
        }
        if let Some(shapes) = patch.shapes {
            self.shapes = shapes;
        }
        if let Some(texts) = patch.texts {
            self.texts = texts;
        }
    }

    /// Check whether the drawing has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.shapes.is_empty() && self.texts.is_empty()
    }
}

/// Payload for creating a drawing
///
/// Unknown fields (including any client-supplied id) are dropped and missing
/// lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDrawing {
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Freehand segments
    #[serde(default)]
    pub lines: Vec<Line>,

    /// Shapes
    #[serde(default)]
    pub shapes: Vec<Shape>,

    /// Text annotations
    #[serde(default)]
    pub texts: Vec<TextAnnotation>,
}

impl NewDrawing {
    /// Validate an arbitrary JSON payload against the drawing shape
    pub fn from_payload(payload: serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload).map_err(|e| Error::validation(e.to_string()))
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingPatch {
    /// Replacement name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Replacement segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<Line>>,

    /// Replacement shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<Shape>>,

    /// Replacement annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<TextAnnotation>>,
}

impl DrawingPatch {
    /// Validate an arbitrary JSON payload against the patch shape
    pub fn from_payload(payload: serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload).map_err(|e| Error::validation(e.to_string()))
    }

    /// Patch that replaces every content list
    #[must_use]
    pub fn replace_all(content: NewDrawing) -> Self {
        Self {
            name: content.name,
            lines: Some(content.lines),
            shapes: Some(content.shapes),
            texts: Some(content.texts),
        }
    }
}
