//! The calculator facade.
//!
//! [`Calculator`] owns the history, the undo/redo caretaker, the history file
//! and the observers, and exposes every user-level operation. Each mutating
//! operation follows the same order: evaluate first, then snapshot, then
//! mutate. A failure before the snapshot leaves nothing behind.

pub mod error;

pub use error::CalculatorError;

use crate::config::CalculatorConfig;
use crate::core::{CalculationRecord, HistoryStore, Operation};
use crate::memento::{Caretaker, Memento};
use crate::observer::{AutoSaveObserver, HistoryObserver, LoggingObserver};
use crate::persistence::{HistoryFile, PersistenceError};
use crate::repl::{help_text, parse_command, Command};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// What the REPL should do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print the message and read the next line
    Continue(String),
    /// Leave the loop
    Exit,
}

/// Interactive calculator with observable history and undo/redo.
///
/// # Example
///
/// ```rust
/// use tally::calculator::Calculator;
/// use tally::config::CalculatorConfig;
/// use tally::core::Operation;
/// use rust_decimal::Decimal;
///
/// let config = CalculatorConfig { auto_save: false, ..CalculatorConfig::default() };
/// let mut calculator = Calculator::new(config);
///
/// calculator.evaluate_and_record(Operation::Add, Decimal::from(10), Decimal::from(5)).unwrap();
/// calculator.evaluate_and_record(Operation::Power, Decimal::from(2), Decimal::from(8)).unwrap();
/// calculator.undo().unwrap();
///
/// assert_eq!(calculator.history().len(), 1);
/// assert_eq!(calculator.history()[0].result(), Decimal::from(15));
/// ```
pub struct Calculator {
    config: CalculatorConfig,
    history: HistoryStore,
    caretaker: Caretaker,
    file: HistoryFile,
    auto_save: Option<Arc<AutoSaveObserver>>,
}

impl Calculator {
    /// Create a calculator with an empty history.
    ///
    /// The logging observer is always subscribed; the auto-save observer
    /// only when `config.auto_save` is set.
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_history(config, Vec::new())
    }

    /// Create a calculator whose history starts with the contents of the
    /// configured history file. The loaded state is not undoable.
    pub fn open(config: CalculatorConfig) -> Result<Self, CalculatorError> {
        let records = HistoryFile::new(&config.history_file).load()?;
        let loaded = records.len();
        let calculator = Self::with_history(config, records);
        info!(
            path = %calculator.file.path().display(),
            loaded,
            kept = calculator.history.len(),
            "history restored"
        );
        Ok(calculator)
    }

    /// Read configuration from the environment, then [`open`](Self::open).
    pub fn from_env() -> Result<Self, CalculatorError> {
        Self::open(CalculatorConfig::from_env()?)
    }

    fn with_history(config: CalculatorConfig, records: Vec<CalculationRecord>) -> Self {
        let file = HistoryFile::new(&config.history_file);
        let mut history = HistoryStore::with_records(config.max_history, records);
        history.subscribe(Arc::new(LoggingObserver::new()));

        let auto_save = config.auto_save.then(|| Arc::new(AutoSaveObserver::new(file.clone())));
        if let Some(observer) = &auto_save {
            history.subscribe(observer.clone());
        }

        Self {
            config,
            history,
            caretaker: Caretaker::new(),
            file,
            auto_save,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Evaluate `operation` and append the result to history as one
    /// undoable step.
    ///
    /// A domain error (division by zero, invalid root, ...) is returned
    /// before anything is snapshotted, so history and undo stacks stay as
    /// they were.
    pub fn evaluate_and_record(
        &mut self,
        operation: Operation,
        a: Decimal,
        b: Decimal,
    ) -> Result<CalculationRecord, CalculatorError> {
        let record = CalculationRecord::evaluate(operation, a, b)?;
        self.caretaker.record_state(&self.history);
        self.history.append(record.clone());
        Ok(record)
    }

    pub fn undo(&mut self) -> Result<(), CalculatorError> {
        self.caretaker.undo(&mut self.history)?;
        info!(size = self.history.len(), "undo");
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), CalculatorError> {
        self.caretaker.redo(&mut self.history)?;
        info!(size = self.history.len(), "redo");
        Ok(())
    }

    /// All records, oldest first.
    pub fn history(&self) -> &[CalculationRecord] {
        self.history.records()
    }

    /// Empty the history as one undoable step.
    pub fn clear_history(&mut self) {
        self.caretaker.record_state(&self.history);
        self.history.clear();
    }

    /// Subscribe an additional observer. Returns `false` if already subscribed.
    pub fn subscribe(&mut self, observer: Arc<dyn HistoryObserver>) -> bool {
        self.history.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, observer: &Arc<dyn HistoryObserver>) -> bool {
        self.history.unsubscribe(observer)
    }

    /// Write the history to the configured file.
    pub fn save(&self) -> Result<&Path, CalculatorError> {
        self.file.save(self.history.records())?;
        info!(path = %self.file.path().display(), rows = self.history.len(), "history saved");
        Ok(self.file.path())
    }

    /// Replace the history with the contents of the configured file, as one
    /// undoable step. Returns the number of records now in history, or
    /// `None` when there is no file, in which case nothing changes.
    ///
    /// Loading is a state reset like undo: observers are not notified.
    pub fn load(&mut self) -> Result<Option<usize>, CalculatorError> {
        if !self.file.exists() {
            info!(path = %self.file.path().display(), "no history file to load");
            return Ok(None);
        }
        let mut records = self.file.load()?;
        let excess = records.len().saturating_sub(self.history.max_history().get());
        if excess > 0 {
            warn!(
                path = %self.file.path().display(),
                dropped = excess,
                "history file exceeds MAX_HISTORY, dropping oldest records"
            );
            records.drain(..excess);
        }

        let memento = Memento::capture(records);
        memento.validate(self.history.max_history())?;
        self.caretaker.record_state(&self.history);
        self.history.restore(&memento)?;
        info!(path = %self.file.path().display(), rows = self.history.len(), "history loaded");
        Ok(Some(self.history.len()))
    }

    /// Collect the error from the last failed auto-save, if any.
    pub fn take_auto_save_error(&self) -> Option<PersistenceError> {
        self.auto_save.as_ref().and_then(|observer| observer.take_error())
    }

    /// Parse and run one line of input.
    pub fn process_line(&mut self, line: &str) -> Result<Outcome, CalculatorError> {
        let command = parse_command(line)?;
        self.execute(command)
    }

    /// Run one parsed command and describe its result.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CalculatorError> {
        let message = match command {
            Command::Exit => return Ok(Outcome::Exit),
            Command::Help => help_text(),
            Command::History => self.render_history(),
            Command::Clear => {
                self.clear_history();
                "History cleared.".to_string()
            }
            Command::Undo => {
                self.undo()?;
                "Undo successful.".to_string()
            }
            Command::Redo => {
                self.redo()?;
                "Redo successful.".to_string()
            }
            Command::Save => {
                let path = self.save()?;
                format!("History saved to '{}'.", path.display())
            }
            Command::Load => match self.load()? {
                Some(count) => format!(
                    "Loaded {count} calculation(s) from '{}'.",
                    self.file.path().display()
                ),
                None => format!("No saved history found at '{}'.", self.file.path().display()),
            },
            Command::Calculate { operation, a, b } => {
                let record = self.evaluate_and_record(operation, a, b)?;
                format!("Result: {record}")
            }
        };
        Ok(Outcome::Continue(message))
    }

    fn render_history(&self) -> String {
        if self.history.is_empty() {
            return "No calculations in history.".to_string();
        }
        let mut lines = vec!["=== Calculation History ===".to_string()];
        lines.extend(
            self.history
                .records()
                .iter()
                .enumerate()
                .map(|(i, record)| format!("  {}. {record}", i + 1)),
        );
        lines.push(String::new());
        lines.push(format!("Total: {} calculation(s)", self.history.len()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memento::MementoError;
    use crate::observer::testing::RecordingObserver;
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    fn setup(auto_save: bool) -> (TempDir, Calculator) {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig {
            history_file: dir.path().join("history.csv"),
            auto_save,
            max_history: NonZeroUsize::new(100).unwrap(),
        };
        (dir, Calculator::new(config))
    }

    fn message(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(message) => message,
            Outcome::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn calculation_line_appends_record() {
        let (_dir, mut calculator) = setup(false);

        let reply = message(calculator.process_line("add 10 5").unwrap());

        assert_eq!(reply, "Result: 10 + 5 = 15");
        assert_eq!(calculator.history().len(), 1);
    }

    #[test]
    fn domain_error_leaves_history_and_stacks_alone() {
        let (_dir, mut calculator) = setup(false);
        calculator.process_line("add 1 1").unwrap();

        let err = calculator.process_line("divide 20 0").unwrap_err();

        assert_eq!(err.to_string(), "Division by zero is not allowed");
        assert_eq!(calculator.history().len(), 1);
        calculator.undo().unwrap();
        assert!(matches!(
            calculator.undo(),
            Err(CalculatorError::Memento(MementoError::NothingToUndo))
        ));
    }

    #[test]
    fn invalid_input_never_reaches_history() {
        let (_dir, mut calculator) = setup(false);
        assert!(matches!(
            calculator.process_line("add five 3"),
            Err(CalculatorError::Input(_))
        ));
        assert!(calculator.history().is_empty());
    }

    #[test]
    fn undo_and_redo_messages() {
        let (_dir, mut calculator) = setup(false);
        assert_eq!(
            calculator.process_line("undo").unwrap_err().to_string(),
            "Nothing to undo"
        );

        calculator.process_line("multiply 6 7").unwrap();
        assert_eq!(message(calculator.process_line("undo").unwrap()), "Undo successful.");
        assert_eq!(message(calculator.process_line("redo").unwrap()), "Redo successful.");
        assert_eq!(
            calculator.process_line("redo").unwrap_err().to_string(),
            "Nothing to redo"
        );
    }

    #[test]
    fn history_rendering() {
        let (_dir, mut calculator) = setup(false);
        assert_eq!(
            message(calculator.process_line("history").unwrap()),
            "No calculations in history."
        );

        calculator.process_line("add 10 5").unwrap();
        calculator.process_line("power 2 8").unwrap();

        assert_eq!(
            message(calculator.process_line("history").unwrap()),
            "=== Calculation History ===\n  1. 10 + 5 = 15\n  2. 2 ^ 8 = 256\n\nTotal: 2 calculation(s)"
        );
    }

    #[test]
    fn clear_is_undoable() {
        let (_dir, mut calculator) = setup(false);
        calculator.process_line("add 1 2").unwrap();
        calculator.process_line("clear").unwrap();
        assert!(calculator.history().is_empty());

        calculator.process_line("undo").unwrap();
        assert_eq!(calculator.history().len(), 1);
    }

    #[test]
    fn exit_ends_the_session() {
        let (_dir, mut calculator) = setup(false);
        assert_eq!(calculator.process_line("exit").unwrap(), Outcome::Exit);
    }

    #[test]
    fn auto_save_writes_after_each_calculation() {
        let (dir, mut calculator) = setup(true);
        calculator.process_line("add 1 2").unwrap();
        calculator.process_line("subtract 9 4").unwrap();

        let saved = HistoryFile::new(dir.path().join("history.csv")).load().unwrap();
        assert_eq!(saved, calculator.history());
        assert!(calculator.take_auto_save_error().is_none());
    }

    #[test]
    fn undo_does_not_trigger_auto_save() {
        let (dir, mut calculator) = setup(true);
        calculator.process_line("add 1 2").unwrap();
        calculator.process_line("add 3 4").unwrap();
        calculator.undo().unwrap();

        let saved = HistoryFile::new(dir.path().join("history.csv")).load().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(calculator.history().len(), 1);
    }

    #[test]
    fn failed_auto_save_keeps_the_calculation() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig {
            history_file: dir.path().join("missing").join("history.csv"),
            auto_save: true,
            max_history: NonZeroUsize::new(10).unwrap(),
        };
        let mut calculator = Calculator::new(config);

        let reply = message(calculator.process_line("add 2 2").unwrap());

        assert_eq!(reply, "Result: 2 + 2 = 4");
        assert_eq!(calculator.history().len(), 1);
        assert!(calculator.take_auto_save_error().is_some());
    }

    #[test]
    fn load_replaces_history_and_is_undoable() {
        let (_dir, mut calculator) = setup(false);
        calculator.process_line("add 1 1").unwrap();
        calculator.process_line("save").unwrap();
        calculator.process_line("add 2 2").unwrap();
        calculator.process_line("add 3 3").unwrap();

        let reply = message(calculator.process_line("load").unwrap());
        assert!(reply.starts_with("Loaded 1 calculation(s)"));
        assert_eq!(calculator.history().len(), 1);

        calculator.undo().unwrap();
        assert_eq!(calculator.history().len(), 3);
    }

    #[test]
    fn load_without_file_keeps_history() {
        let (_dir, mut calculator) = setup(false);
        calculator.process_line("add 1 1").unwrap();
        calculator.process_line("add 2 2").unwrap();

        let reply = message(calculator.process_line("load").unwrap());

        assert!(reply.starts_with("No saved history found at"), "{reply}");
        assert_eq!(calculator.history().len(), 2);
        calculator.undo().unwrap();
        assert_eq!(calculator.history().len(), 1);
        calculator.undo().unwrap();
        assert!(calculator.history().is_empty());
        assert!(calculator.undo().is_err());
    }

    #[test]
    fn load_keeps_only_most_recent_records() {
        let (dir, mut calculator) = setup(false);
        let mut records = Vec::new();
        for n in 0..5 {
            records.push(
                CalculationRecord::create("add", Decimal::from(n), Decimal::ZERO).unwrap(),
            );
        }
        HistoryFile::new(dir.path().join("history.csv")).save(&records).unwrap();

        let config = CalculatorConfig {
            max_history: NonZeroUsize::new(3).unwrap(),
            ..calculator.config().clone()
        };
        calculator = Calculator::new(config);

        assert_eq!(calculator.load().unwrap(), Some(3));
        assert_eq!(calculator.history()[0].result(), Decimal::from(2));
    }

    #[test]
    fn open_restores_saved_history() {
        let (dir, mut calculator) = setup(false);
        calculator.process_line("add 10 5").unwrap();
        calculator.save().unwrap();

        let reopened = Calculator::open(calculator.config().clone()).unwrap();

        assert_eq!(reopened.history(), calculator.history());
        assert!(dir.path().join("history.csv").exists());
    }

    #[test]
    fn extra_observers_receive_events() {
        let (_dir, mut calculator) = setup(false);
        let recording = Arc::new(RecordingObserver::default());
        let observer: Arc<dyn HistoryObserver> = recording.clone();

        assert!(calculator.subscribe(observer.clone()));
        calculator.process_line("add 5 3").unwrap();
        assert!(calculator.unsubscribe(&observer));
        calculator.process_line("add 1 1").unwrap();

        assert_eq!(recording.seen(), vec!["added 5 + 3 = 8 (1 total)".to_string()]);
    }
}
