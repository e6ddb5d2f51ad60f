//! Observer that persists the history after every calculation.

use super::{HistoryEvent, HistoryObserver};
use crate::persistence::{HistoryFile, PersistenceError};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Writes the full history to its file whenever a record is added.
///
/// A failed write is logged and parked until the owner collects it with
/// [`take_error`](Self::take_error). It is never raised out of `notify`, so
/// the append that triggered the save stays committed.
#[derive(Debug)]
pub struct AutoSaveObserver {
    file: HistoryFile,
    last_error: Mutex<Option<PersistenceError>>,
}

impl AutoSaveObserver {
    pub fn new(file: HistoryFile) -> Self {
        Self {
            file,
            last_error: Mutex::new(None),
        }
    }

    pub fn file(&self) -> &HistoryFile {
        &self.file
    }

    /// Take the error from the most recent failed save, if any.
    pub fn take_error(&self) -> Option<PersistenceError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl HistoryObserver for AutoSaveObserver {
    fn notify(&self, event: &HistoryEvent<'_>) {
        let HistoryEvent::Added { history, .. } = event else {
            return;
        };

        let outcome = self.file.save(history);
        let mut slot = self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match outcome {
            Ok(()) => {
                debug!(path = %self.file.path().display(), rows = history.len(), "auto-saved history");
                *slot = None;
            }
            Err(err) => {
                warn!(path = %self.file.path().display(), error = %err, "auto-save failed");
                *slot = Some(err);
            }
        }
    }
}
