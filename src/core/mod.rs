//! Core calculation types.
//!
//! This module contains the value types and the history they live in:
//! - The closed registry of arithmetic operations
//! - Immutable calculation records and their factory
//! - The ordered, bounded history store with observer subscriptions

mod error;
mod history;
mod operation;
mod record;

pub use error::OperationError;
pub use history::{HistoryStore, DEFAULT_MAX_HISTORY};
pub use operation::{supported_operations, Operation};
pub use record::CalculationRecord;
