//! CSV persistence for calculation history.
//!
//! The history file is a plain table with a header row and one row per
//! record, in insertion order:
//!
//! ```text
//! operator,operand_a,operand_b,result,timestamp
//! add,10,5,15,2026-10-17T09:30:00.123456789Z
//! ```
//!
//! Rows go through serde: numbers are written in their exact decimal form and
//! timestamps as RFC 3339, so a save followed by a load reproduces the records
//! exactly. Columns are matched by header name. A load aborts
//! on the first malformed row instead of skipping it.

pub mod error;

pub use error::PersistenceError;

use crate::core::{CalculationRecord, Operation};
use chrono::{DateTime, Utc};
use csv::{DeserializeError, StringRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Column names, in the order they are written.
pub const COLUMNS: [&str; 5] = ["operator", "operand_a", "operand_b", "result", "timestamp"];

/// One row of the history file. Field order matches [`COLUMNS`].
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    operator: Operation,
    #[serde(with = "rust_decimal::serde::str")]
    operand_a: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    operand_b: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    result: Decimal,
    timestamp: DateTime<Utc>,
}

impl From<&CalculationRecord> for HistoryRow {
    fn from(record: &CalculationRecord) -> Self {
        Self {
            operator: record.operator(),
            operand_a: record.operand_a(),
            operand_b: record.operand_b(),
            result: record.result(),
            timestamp: record.timestamp(),
        }
    }
}

impl From<HistoryRow> for CalculationRecord {
    fn from(row: HistoryRow) -> Self {
        CalculationRecord::from_parts(
            row.operator,
            row.operand_a,
            row.operand_b,
            row.result,
            row.timestamp,
        )
    }
}

/// Handle to the CSV file that stores the history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there is anything on disk to load.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `records` to the file, replacing its previous contents.
    ///
    /// The table is written to a sibling temporary file first and renamed
    /// into place, so readers never observe a half-written history. The
    /// temporary file is removed if either step fails.
    pub fn save(&self, records: &[CalculationRecord]) -> Result<(), PersistenceError> {
        let staging = self.staging_path();
        let saved = self.write_table(&staging, records).and_then(|()| {
            fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
        });

        if saved.is_err() {
            match fs::remove_file(&staging) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => warn!(path = %staging.display(), %err, "could not remove staging file"),
            }
        }
        saved?;

        debug!(path = %self.path.display(), rows = records.len(), "history saved");
        Ok(())
    }

    fn write_table(&self, staging: &Path, records: &[CalculationRecord]) -> Result<(), PersistenceError> {
        // The header is written by hand so an empty history still gets one.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(staging)
            .map_err(|source| self.csv_error(source))?;

        writer
            .write_record(COLUMNS)
            .map_err(|source| self.csv_error(source))?;
        for record in records {
            writer
                .serialize(HistoryRow::from(record))
                .map_err(|source| self.csv_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))
    }

    /// Read every record from the file, in file order.
    ///
    /// A missing file is an empty history. Any malformed row or missing
    /// column fails the whole load.
    pub fn load(&self) -> Result<Vec<CalculationRecord>, PersistenceError> {
        if !self.exists() {
            debug!(path = %self.path.display(), "no history file, starting empty");
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|source| self.csv_error(source))?;

        let headers = reader
            .headers()
            .map_err(|source| self.csv_error(source))?
            .clone();
        if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
            return Err(self.parse_error(1, format!("missing column '{missing}'")));
        }

        let records = reader
            .deserialize::<HistoryRow>()
            .map(|row| {
                row.map(CalculationRecord::from)
                    .map_err(|source| self.row_error(&headers, source))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(path = %self.path.display(), rows = records.len(), "history loaded");
        Ok(records)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Turn a row that failed to deserialize into a `Parse` error naming the
    /// line and column. Other csv failures pass through unchanged.
    fn row_error(&self, headers: &StringRecord, source: csv::Error) -> PersistenceError {
        let line = source.position().map_or(0, |p| p.line());
        match source.kind() {
            csv::ErrorKind::Deserialize { err, .. } => {
                self.parse_error(line, describe_field(headers, err))
            }
            _ => self.csv_error(source),
        }
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> PersistenceError {
        PersistenceError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn parse_error(&self, line: u64, message: String) -> PersistenceError {
        PersistenceError::Parse {
            path: self.path.clone(),
            line,
            message,
        }
    }
}

fn describe_field(headers: &StringRecord, err: &DeserializeError) -> String {
    let column = err
        .field()
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| headers.get(index));
    match column {
        Some(name) => format!("invalid {name}: {}", err.kind()),
        None => err.to_string(),
    }
}
