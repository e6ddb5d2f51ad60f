//! Undo/redo stacks over history snapshots.

use super::{Memento, MementoError};
use crate::core::HistoryStore;
use std::num::NonZeroUsize;

/// Owner of the undo and redo stacks.
///
/// Call [`record_state`](Self::record_state) immediately before every
/// undoable change to the history. That pushes the pre-change state and
/// invalidates the redo stack, giving standard linear undo.
///
/// # Example
///
/// ```rust
/// use tally::core::{CalculationRecord, HistoryStore};
/// use tally::memento::Caretaker;
/// use rust_decimal::Decimal;
///
/// let mut history = HistoryStore::default();
/// let mut caretaker = Caretaker::new();
///
/// caretaker.record_state(&history);
/// history.append(CalculationRecord::create("add", Decimal::ONE, Decimal::ONE).unwrap());
///
/// caretaker.undo(&mut history).unwrap();
/// assert!(history.is_empty());
///
/// caretaker.redo(&mut history).unwrap();
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Caretaker {
    undo_stack: Vec<Memento>,
    redo_stack: Vec<Memento>,
    limit: Option<NonZeroUsize>,
}

impl Caretaker {
    /// Create a caretaker with unbounded stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a caretaker that keeps at most `limit` undo steps, dropping
    /// the oldest once exceeded.
    pub fn with_limit(limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Snapshot `history` as the state to return to on the next undo.
    ///
    /// Legal on an empty history: undoing the first change then returns the
    /// history to empty.
    pub fn record_state(&mut self, history: &HistoryStore) {
        self.push_undo(history.snapshot());
        self.redo_stack.clear();
    }

    /// Return `history` to the most recently recorded state.
    ///
    /// The state being left is kept for [`redo`](Self::redo). On error,
    /// neither the history nor the stacks change.
    pub fn undo(&mut self, history: &mut HistoryStore) -> Result<(), MementoError> {
        let previous = self.undo_stack.pop().ok_or(MementoError::NothingToUndo)?;
        let current = history.snapshot();
        if let Err(err) = history.restore(&previous) {
            self.undo_stack.push(previous);
            return Err(err);
        }
        self.redo_stack.push(current);
        Ok(())
    }

    /// Re-apply the most recently undone state.
    pub fn redo(&mut self, history: &mut HistoryStore) -> Result<(), MementoError> {
        let next = self.redo_stack.pop().ok_or(MementoError::NothingToRedo)?;
        let current = history.snapshot();
        if let Err(err) = history.restore(&next) {
            self.redo_stack.push(next);
            return Err(err);
        }
        self.push_undo(current);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn push_undo(&mut self, memento: Memento) {
        self.undo_stack.push(memento);
        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit.get());
            self.undo_stack.drain(..excess);
        }
    }
}
