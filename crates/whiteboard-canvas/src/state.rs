//! Canvas Drawing State
//!
//! The editable state of one drawing session. Pointer and toolbar events are
//! turned into [`CanvasAction`]s and applied one at a time through
//! [`CanvasState::dispatch`], which reports what needs painting as an
//! [`Effect`]. The state never touches a surface itself, so it can be driven
//! and inspected without a renderer.

use serde::{Deserialize, Serialize};
use tracing::debug;
use whiteboard_core::{
    Color, Drawing, DrawingPatch, Line, NewDrawing, Point, Shape, TextAnnotation,
};

use crate::config::{CanvasConfig, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::history::{History, Operation};

/// How pointer events are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Freehand strokes
    #[default]
    FreeDraw,
    /// Drag out a rectangle
    Rectangle,
    /// Drag out a circle from its center
    Circle,
    /// Click to place the current text
    Text,
}

/// A single user action
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    /// Switch tools
    SetMode(Mode),
    /// Change the stroke color
    SetColor(Color),
    /// Change the freehand width
    SetLineWidth(f64),
    /// Change the text placed by the text tool
    SetText(String),
    /// Pointer pressed
    PointerDown(Point),
    /// Pointer moved
    PointerMove(Point),
    /// Pointer released
    PointerUp(Point),
    /// Wipe the session's content
    Clear,
    /// Revert the newest operation
    Undo,
    /// Re-apply the newest undone operation
    Redo,
    /// Replace the session's content with a fetched drawing
    Load(Drawing),
}

/// What a dispatched action asks the renderer to do
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing changed on screen
    None,
    /// Paint one new segment on top of the surface
    PaintLine(Line),
    /// Paint one new shape on top of the surface
    PaintShape(Shape),
    /// Repaint everything from the state
    Repaint,
}

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    last: Point,
    segments: usize,
}

/// Session state: content, tool settings, in-progress gesture and history
#[derive(Debug, Clone)]
pub struct CanvasState {
    mode: Mode,
    color: Color,
    line_width: f64,
    text: String,
    lines: Vec<Line>,
    shapes: Vec<Shape>,
    texts: Vec<TextAnnotation>,
    stroke: Option<ActiveStroke>,
    anchor: Option<Point>,
    history: History<Operation>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl CanvasState {
    /// Empty state with the configured defaults
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            mode: Mode::default(),
            color: config.default_color.clone(),
            line_width: config.default_line_width,
            text: String::new(),
            lines: Vec::new(),
            shapes: Vec::new(),
            texts: Vec::new(),
            stroke: None,
            anchor: None,
            history: History::new(config.history_limit),
        }
    }

    /// Apply one action
    pub fn dispatch(&mut self, action: CanvasAction) -> Effect {
        match action {
            CanvasAction::SetMode(mode) => {
                self.set_mode(mode);
                Effect::None
            }
            CanvasAction::SetColor(color) => {
                self.color = color;
                Effect::None
            }
            CanvasAction::SetLineWidth(width) => {
                self.set_line_width(width);
                Effect::None
            }
            CanvasAction::SetText(text) => {
                self.text = text;
                Effect::None
            }
            CanvasAction::PointerDown(point) => {
                if self.mode == Mode::FreeDraw {
                    self.start_free_draw(point);
                } else {
                    self.begin_shape(point);
                }
                Effect::None
            }
            CanvasAction::PointerMove(point) => {
                if self.mode != Mode::FreeDraw {
                    return Effect::None;
                }
                self.continue_free_draw(point)
                    .map_or(Effect::None, Effect::PaintLine)
            }
            CanvasAction::PointerUp(point) => {
                if self.mode == Mode::FreeDraw {
                    self.end_free_draw();
                    Effect::None
                } else {
                    self.commit_shape(point)
                        .map_or(Effect::None, Effect::PaintShape)
                }
            }
            CanvasAction::Clear => {
                self.clear();
                Effect::Repaint
            }
            CanvasAction::Undo => {
                if self.undo() {
                    Effect::Repaint
                } else {
                    Effect::None
                }
            }
            CanvasAction::Redo => {
                if self.redo() {
                    Effect::Repaint
                } else {
                    Effect::None
                }
            }
            CanvasAction::Load(drawing) => {
                self.load(drawing);
                Effect::Repaint
            }
        }
    }

    /// Switch tools, abandoning any gesture in progress
    pub fn set_mode(&mut self, mode: Mode) {
        self.end_free_draw();
        self.anchor = None;
        self.mode = mode;
    }

    /// Set the freehand width, clamped to the width control's range
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
    }

    /// Begin a stroke at `point`
    pub fn start_free_draw(&mut self, point: Point) {
        self.end_free_draw();
        self.stroke = Some(ActiveStroke {
            last: point,
            segments: 0,
        });
    }

    /// Extend the active stroke to `point`, returning the new segment
    pub fn continue_free_draw(&mut self, point: Point) -> Option<Line> {
        let stroke = self.stroke.as_mut()?;
        let line = Line {
            start: stroke.last,
            end: point,
            color: self.color.clone(),
            line_width: self.line_width,
        };
        stroke.last = point;
        stroke.segments += 1;
        self.lines.push(line.clone());
        Some(line)
    }

    /// Close the active stroke; a stroke with segments becomes one undo step
    pub fn end_free_draw(&mut self) {
        let Some(stroke) = self.stroke.take() else {
            return;
        };
        if stroke.segments == 0 {
            return;
        }
        let first = self.lines.len() - stroke.segments;
        self.history
            .record(Operation::Stroke(self.lines[first..].to_vec()));
    }

    /// Anchor a shape at `point`
    pub fn begin_shape(&mut self, point: Point) {
        self.anchor = Some(point);
    }

    /// Finish the anchored shape at `point`
    ///
    /// Returns `None` without an anchor, in free-draw mode, or when the text
    /// tool has no text to place.
    pub fn commit_shape(&mut self, point: Point) -> Option<Shape> {
        let anchor = self.anchor.take()?;
        let shape = match self.mode {
            Mode::Rectangle => Shape::rectangle(anchor, point, self.color.clone()),
            Mode::Circle => Shape::circle(anchor, point, self.color.clone()),
            Mode::Text if !self.text.is_empty() => {
                Shape::text(point, self.text.clone(), self.color.clone())
            }
            Mode::Text | Mode::FreeDraw => return None,
        };
        self.shapes.push(shape.clone());
        self.history.record(Operation::Shape(shape.clone()));
        Some(shape)
    }

    /// Wipe the session's content; undoable
    pub fn clear(&mut self) {
        self.end_free_draw();
        self.anchor = None;
        if self.is_empty() {
            return;
        }
        self.history.record(Operation::Clear {
            lines: std::mem::take(&mut self.lines),
            shapes: std::mem::take(&mut self.shapes),
            texts: std::mem::take(&mut self.texts),
        });
    }

    /// Revert the newest operation; `false` when there was none
    pub fn undo(&mut self) -> bool {
        self.end_free_draw();
        let Some(op) = self.history.undo() else {
            return false;
        };
        match op {
            Operation::Stroke(lines) => {
                let keep = self.lines.len().saturating_sub(lines.len());
                self.lines.truncate(keep);
            }
            Operation::Shape(_) => {
                self.shapes.pop();
            }
            Operation::Clear {
                lines,
                shapes,
                texts,
            } => {
                self.lines = lines.clone();
                self.shapes = shapes.clone();
                self.texts = texts.clone();
            }
        }
        debug!(remaining = self.history.undo_len(), "undo");
        true
    }

    /// Re-apply the newest undone operation; `false` when there was none
    pub fn redo(&mut self) -> bool {
        self.end_free_draw();
        let Some(op) = self.history.redo() else {
            return false;
        };
        match op {
            Operation::Stroke(lines) => self.lines.extend(lines.iter().cloned()),
            Operation::Shape(shape) => self.shapes.push(shape.clone()),
            Operation::Clear { .. } => {
                self.lines.clear();
                self.shapes.clear();
                self.texts.clear();
            }
        }
        debug!(remaining = self.history.redo_len(), "redo");
        true
    }

    /// Replace the content with a fetched drawing and start a fresh history
    pub fn load(&mut self, drawing: Drawing) {
        self.stroke = None;
        self.anchor = None;
        self.lines = drawing.lines;
        self.shapes = drawing.shapes;
        self.texts = drawing.texts;
        self.history.clear();
    }

    /// Owned copy of the content, ready to send as a create payload
    #[must_use]
    pub fn snapshot(&self) -> NewDrawing {
        NewDrawing {
            name: None,
            lines: self.lines.clone(),
            shapes: self.shapes.clone(),
            texts: self.texts.clone(),
        }
    }

    /// Update payload replacing every content list
    #[must_use]
    pub fn patch(&self) -> DrawingPatch {
        DrawingPatch::replace_all(self.snapshot())
    }

    /// Current tool
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current stroke color
    #[must_use]
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Current freehand width
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Text placed by the text tool
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Segments in draw order
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Shapes in draw order
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Text annotations
    #[must_use]
    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    /// Whether a stroke is in progress
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Undo/redo stacks
    #[must_use]
    pub fn history(&self) -> &History<Operation> {
        &self.history
    }

    /// Whether the session has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.shapes.is_empty() && self.texts.is_empty()
    }
}
