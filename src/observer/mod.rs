//! History observers.
//!
//! Observers subscribe to a [`HistoryStore`](crate::core::HistoryStore) and
//! are told about every committed append or clear. They run synchronously, in
//! subscription order, after the store has already changed; nothing an
//! observer does can undo the mutation that triggered it.
//!
//! Restoring a snapshot during undo/redo is not an event: observers only hear
//! about logical changes, so undo never re-triggers side effects such as an
//! auto-save write.

mod autosave;
mod logging;

pub use autosave::AutoSaveObserver;
pub use logging::LoggingObserver;

use crate::core::CalculationRecord;

/// A committed change to the history.
#[derive(Clone, Copy, Debug)]
pub enum HistoryEvent<'a> {
    /// A record was appended.
    ///
    /// `history` is the full sequence after the append (and any eviction).
    Added {
        record: &'a CalculationRecord,
        history: &'a [CalculationRecord],
    },

    /// The history was emptied
    Cleared,
}

/// Listener notified on every history mutation.
///
/// `notify` cannot fail: an observer that hits an error must deal with it
/// itself, so one observer can never stop the others from running.
pub trait HistoryObserver: Send + Sync {
    fn notify(&self, event: &HistoryEvent<'_>);
}
