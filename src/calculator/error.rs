//! Facade error type.

use crate::config::ConfigError;
use crate::core::OperationError;
use crate::memento::MementoError;
use crate::persistence::PersistenceError;
use crate::repl::InputError;
use thiserror::Error;

/// Any error a calculator command can report.
///
/// None of these are fatal: the history and undo stacks are left as they
/// were before the failing command.
#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Memento(#[from] MementoError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
