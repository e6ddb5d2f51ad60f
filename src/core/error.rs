//! Operation error types.

use thiserror::Error;

/// Errors raised while resolving or evaluating an arithmetic operation.
///
/// None of these leave a trace in the history: a failed evaluation never
/// produces a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// The operator name is not one of the supported operations
    #[error("Unknown operation '{name}'. Supported: {supported}")]
    UnknownOperation { name: String, supported: String },

    /// Division (or a zero base raised to a negative power) by zero
    #[error("Division by zero is not allowed")]
    DivisionByZero,

    /// Zero-degree root, or a root of a negative number that has no real value
    #[error("Invalid root: {reason}")]
    InvalidRoot { reason: String },

    /// The result has no real decimal value
    #[error("Undefined result: {reason}")]
    Undefined { reason: String },

    /// The result does not fit the decimal range
    #[error("Result of {operation} is out of range")]
    Overflow { operation: &'static str },
}
