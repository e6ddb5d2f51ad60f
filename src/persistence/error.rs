//! Persistence error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the history file
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file could not be opened, created or flushed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer failed to read or write a row
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row was read but does not describe a valid calculation
    #[error("Malformed history file '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}
