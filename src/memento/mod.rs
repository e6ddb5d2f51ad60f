//! Snapshot and restore of calculation history.
//!
//! A [`Memento`] is a deep copy of the history's records at one point in
//! time. The [`Caretaker`] keeps two stacks of them and moves the history
//! back and forth between snapshots to implement linear undo/redo.

mod caretaker;
pub mod error;

pub use caretaker::Caretaker;
pub use error::MementoError;

use crate::core::CalculationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use uuid::Uuid;

/// Immutable snapshot of the history's records.
///
/// The records are owned outright, never shared with the live history, so
/// later changes to the history cannot leak into a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memento {
    id: Uuid,
    taken_at: DateTime<Utc>,
    records: Vec<CalculationRecord>,
}

impl Memento {
    pub(crate) fn capture(records: Vec<CalculationRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            records,
        }
    }

    /// Unique snapshot identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the snapshot was taken
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check that the snapshot could be the state of a history bounded by
    /// `max_history`.
    pub(crate) fn validate(&self, max_history: NonZeroUsize) -> Result<(), MementoError> {
        if self.records.len() > max_history.get() {
            return Err(self.corrupt(format!(
                "holds {} records, history is bounded to {}",
                self.records.len(),
                max_history
            )));
        }
        Ok(())
    }

    fn corrupt(&self, reason: String) -> MementoError {
        MementoError::CorruptMemento {
            id: self.id.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Memento {
        Memento::capture(vec![
            CalculationRecord::create("add", Decimal::from(10), Decimal::from(5)).unwrap(),
            CalculationRecord::create("root", Decimal::from(27), Decimal::from(3)).unwrap(),
        ])
    }

    #[test]
    fn memento_serialization() {
        let memento = sample();

        let json = serde_json::to_string(&memento).unwrap();
        let restored: Memento = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, memento);
        assert_eq!(restored.id(), memento.id());
    }

    #[test]
    fn validate_checks_only_the_size_bound() {
        let memento = sample();

        assert!(memento.validate(NonZeroUsize::new(2).unwrap()).is_ok());
        assert!(matches!(
            memento.validate(NonZeroUsize::new(1).unwrap()),
            Err(MementoError::CorruptMemento { .. })
        ));
    }
}
