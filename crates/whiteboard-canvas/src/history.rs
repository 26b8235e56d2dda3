//! Undo/Redo History
//!
//! Two bounded stacks of reversible operations. Recording a new operation
//! discards everything that could have been redone; when a stack is full the
//! oldest entry is evicted.

use std::collections::VecDeque;

use whiteboard_core::{Line, Shape, TextAnnotation};

/// One reversible editing step
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A completed freehand stroke: the segments it appended
    Stroke(Vec<Line>),

    /// A committed shape
    Shape(Shape),

    /// A clear, with everything it removed
    Clear {
        /// Segments present before the clear
        lines: Vec<Line>,
        /// Shapes present before the clear
        shapes: Vec<Shape>,
        /// Annotations present before the clear
        texts: Vec<TextAnnotation>,
    },
}

/// Bounded undo/redo stacks
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    /// Create a history keeping at most `limit` entries per stack
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record a new operation, dropping the redo stack
    pub fn record(&mut self, op: T) {
        self.redo.clear();
        push_bounded(&mut self.undo, op, self.limit);
    }

    /// Move the newest operation to the redo stack and return it
    pub fn undo(&mut self) -> Option<&T> {
        let op = self.undo.pop_back()?;
        push_bounded(&mut self.redo, op, self.limit);
        self.redo.back()
    }

    /// Move the newest undone operation back and return it
    pub fn redo(&mut self) -> Option<&T> {
        let op = self.redo.pop_back()?;
        push_bounded(&mut self.undo, op, self.limit);
        self.undo.back()
    }

    /// Whether an undo is possible
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo is possible
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Depth of the undo stack
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Depth of the redo stack
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Configured depth
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, op: T, limit: usize) {
    if stack.len() == limit {
        stack.pop_front();
    }
    stack.push_back(op);
}
