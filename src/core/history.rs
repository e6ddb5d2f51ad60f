//! Calculation history tracking.
//!
//! Provides the ordered, size-bounded store of calculation records and the
//! observer subscriptions that are told about every change to it.

use super::record::CalculationRecord;
use crate::memento::{Memento, MementoError};
use crate::observer::{HistoryEvent, HistoryObserver};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default bound on the number of records kept in history.
pub const DEFAULT_MAX_HISTORY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => panic!("default history size must be non-zero"),
};

/// Ordered history of calculations.
///
/// Insertion order is display order. The store never
/// holds more than `max_history` records: appending past the bound evicts the
/// oldest ones first.
///
/// # Example
///
/// ```rust
/// use tally::core::{CalculationRecord, HistoryStore};
/// use rust_decimal::Decimal;
/// use std::num::NonZeroUsize;
///
/// let mut history = HistoryStore::new(NonZeroUsize::new(2).unwrap());
///
/// for n in 1..=3 {
///     let record = CalculationRecord::create("add", Decimal::from(n), Decimal::ZERO).unwrap();
///     history.append(record);
/// }
///
/// let results: Vec<_> = history.records().iter().map(|r| r.result()).collect();
/// assert_eq!(results, vec![Decimal::from(2), Decimal::from(3)]);
/// ```
pub struct HistoryStore {
    records: Vec<CalculationRecord>,
    max_history: NonZeroUsize,
    observers: Vec<Arc<dyn HistoryObserver>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryStore {
    /// Create a new empty history.
    pub fn new(max_history: NonZeroUsize) -> Self {
        Self {
            records: Vec::new(),
            max_history,
            observers: Vec::new(),
        }
    }

    /// Create a history pre-populated with `records`, oldest first.
    ///
    /// Only the most recent `max_history` records are kept. Observers are not
    /// involved: the store starts with no subscribers.
    pub fn with_records(max_history: NonZeroUsize, mut records: Vec<CalculationRecord>) -> Self {
        let excess = records.len().saturating_sub(max_history.get());
        records.drain(..excess);
        Self {
            records,
            max_history,
            observers: Vec::new(),
        }
    }

    /// Append a record, evicting the oldest records beyond the bound, then
    /// notify observers.
    pub fn append(&mut self, record: CalculationRecord) {
        self.records.push(record);
        let excess = self.records.len().saturating_sub(self.max_history.get());
        self.records.drain(..excess);

        if let Some(added) = self.records.last() {
            self.notify(&HistoryEvent::Added {
                record: added,
                history: &self.records,
            });
        }
    }

    /// Remove every record, then notify observers.
    pub fn clear(&mut self) {
        self.records.clear();
        self.notify(&HistoryEvent::Cleared);
    }

    /// Take an independent copy of the current records.
    pub fn snapshot(&self) -> Memento {
        Memento::capture(self.records.clone())
    }

    /// Replace the whole history with the contents of `memento`.
    ///
    /// This is a state reset, not a logical change: observers are not
    /// notified. Fails without touching the store if the memento holds more
    /// records than this store may keep.
    pub fn restore(&mut self, memento: &Memento) -> Result<(), MementoError> {
        memento.validate(self.max_history)?;
        self.records = memento.records().to_vec();
        Ok(())
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    /// Owned copy of all records, oldest first.
    pub fn list(&self) -> Vec<CalculationRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record
    pub fn last(&self) -> Option<&CalculationRecord> {
        self.records.last()
    }

    pub fn max_history(&self) -> NonZeroUsize {
        self.max_history
    }

    /// Subscribe an observer.
    ///
    /// Returns `false` and changes nothing if this exact observer instance is
    /// already subscribed.
    pub fn subscribe(&mut self, observer: Arc<dyn HistoryObserver>) -> bool {
        if self.position_of(&observer).is_some() {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Unsubscribe an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, observer: &Arc<dyn HistoryObserver>) -> bool {
        match self.position_of(observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn position_of(&self, observer: &Arc<dyn HistoryObserver>) -> Option<usize> {
        self.observers
            .iter()
            .position(|o| std::ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(observer)))
    }

    fn notify(&self, event: &HistoryEvent<'_>) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("records", &self.records)
            .field("max_history", &self.max_history)
            .field("observers", &self.observers.len())
            .finish()
    }
}
