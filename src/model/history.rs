//! Undo/redo history of full document snapshots

use super::document::DocumentState;

/// Default maximum undo depth
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Linear undo/redo stacks.
///
/// Each entry is a complete deep copy of the document, so later in-place
/// edits to the live model can never reach into history.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<DocumentState>,
    redo_stack: Vec<DocumentState>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new history with default max size
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a new history with specified max size (at least 1)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Push a snapshot onto the undo stack (clears redo stack)
    pub fn push(&mut self, state: DocumentState) {
        self.redo_stack.clear();
        self.undo_stack.push(state);

        // Trim if exceeded max size
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop the newest undo snapshot, parking `current` on the redo stack
    pub fn pop_undo(&mut self, current: DocumentState) -> Option<DocumentState> {
        let state = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(state)
    }

    /// Pop the newest redo snapshot, parking `current` on the undo stack
    pub fn pop_redo(&mut self, current: DocumentState) -> Option<DocumentState> {
        let state = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
