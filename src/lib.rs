//! Tally: an interactive decimal calculator with undoable history.
//!
//! Every evaluated operation becomes an immutable record in an ordered,
//! bounded history. Observers hear about every change to that history, and
//! a caretaker of snapshots lets any change be undone and redone.
//!
//! # Core Concepts
//!
//! - **Records**: Exact decimal results, never floating point
//! - **History**: Ordered, bounded, observable sequence of records
//! - **Mementos**: Deep-copied snapshots driving linear undo/redo
//! - **Persistence**: A CSV history file, optionally saved after every calculation
//!
//! # Example
//!
//! ```rust
//! use tally::core::{CalculationRecord, HistoryStore};
//! use tally::memento::Caretaker;
//! use rust_decimal::Decimal;
//!
//! let mut history = HistoryStore::default();
//! let mut caretaker = Caretaker::new();
//!
//! for (op, a, b) in [("add", 10, 5), ("power", 2, 8)] {
//!     let record = CalculationRecord::create(op, Decimal::from(a), Decimal::from(b)).unwrap();
//!     caretaker.record_state(&history);
//!     history.append(record);
//! }
//!
//! caretaker.undo(&mut history).unwrap();
//! assert_eq!(history.len(), 1);
//! assert_eq!(history.records()[0].to_string(), "10 + 5 = 15");
//! ```

pub mod calculator;
pub mod config;
pub mod core;
pub mod memento;
pub mod observer;
pub mod persistence;
pub mod repl;

// Re-export commonly used types
pub use calculator::{Calculator, CalculatorError};
pub use self::core::{CalculationRecord, HistoryStore, Operation};
pub use memento::{Caretaker, Memento};
