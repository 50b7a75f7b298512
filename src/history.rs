//! History manager: undo/redo over whole-list snapshots.
//!
//! Snapshots are full copies of the element list rather than diffs. Label
//! designs hold tens of elements, so the memory trade is negligible and the
//! restore path is trivially correct.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::element::LabelElement;

/// A captured element list.
pub type Snapshot = Vec<LabelElement>;

/// Two-stack undo/redo state machine.
///
/// Every committing mutation pushes the pre-mutation snapshot via
/// [`History::commit`], which clears the redo stack. [`History::undo`] and
/// [`History::redo`] move snapshots between the stacks and never clear
/// either one.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state. Invalidates any redo branch.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Pop the most recent snapshot, banking `current` for redo.
    ///
    /// Returns `None` (and leaves both stacks untouched) when there is
    /// nothing to undo.
    #[must_use]
    pub fn undo(&mut self, current: &[LabelElement]) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_vec());
        Some(snapshot)
    }

    /// Symmetric to [`History::undo`]: pop a redo snapshot, banking
    /// `current` for undo.
    #[must_use]
    pub fn redo(&mut self, current: &[LabelElement]) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_vec());
        Some(snapshot)
    }

    /// Drop both stacks. Used when a design is loaded wholesale.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
