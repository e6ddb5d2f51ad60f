//! Undo/redo error types.

use thiserror::Error;

/// Errors that can occur while moving through undo/redo history
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MementoError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// A snapshot violates the history's invariants and cannot be restored
    #[error("Corrupt snapshot {id}: {reason}")]
    CorruptMemento { id: String, reason: String },
}
