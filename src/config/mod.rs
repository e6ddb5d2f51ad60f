//! Calculator configuration.
//!
//! Settings come from an optional `.env` file and the process environment.
//! A value in the file wins over the same variable in the environment:
//!
//! | variable       | meaning                              | default       |
//! |----------------|--------------------------------------|---------------|
//! | `HISTORY_FILE` | path of the CSV history file         | `history.csv` |
//! | `AUTO_SAVE`    | save after every calculation         | `true`        |
//! | `MAX_HISTORY`  | records kept before evicting oldest  | `1000`        |
//!
//! Every variable is validated and all problems are reported together,
//! using `Validation` to accumulate them instead of stopping at the first.

pub mod error;

pub use error::{ConfigError, ConfigIssue};

use crate::core::DEFAULT_MAX_HISTORY;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub const HISTORY_FILE_VAR: &str = "HISTORY_FILE";
pub const AUTO_SAVE_VAR: &str = "AUTO_SAVE";
pub const MAX_HISTORY_VAR: &str = "MAX_HISTORY";

pub const DEFAULT_HISTORY_FILE: &str = "history.csv";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Immutable calculator settings, passed explicitly to whatever needs them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// CSV file used by `save`, `load` and auto-save
    pub history_file: PathBuf,

    /// Whether every calculation is written to `history_file` immediately
    pub auto_save: bool,

    /// Upper bound on the number of records in history
    pub max_history: NonZeroUsize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            auto_save: true,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl CalculatorConfig {
    /// Load settings from `./.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_file(DEFAULT_ENV_FILE)
    }

    /// Load settings from the dotenv file at `path` and the process
    /// environment. A missing file is skipped; values in the file override
    /// the environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(path.as_ref())?;
        Self::from_lookup(|key| {
            file_vars
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Load settings from an arbitrary key lookup.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tally::config::CalculatorConfig;
    ///
    /// let config = CalculatorConfig::from_lookup(|key| match key {
    ///     "AUTO_SAVE" => Some("no".to_string()),
    ///     "MAX_HISTORY" => Some("50".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert!(!config.auto_save);
    /// assert_eq!(config.max_history.get(), 50);
    /// assert_eq!(config.history_file.to_str(), Some("history.csv"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let history_file = parse_path(
            HISTORY_FILE_VAR,
            lookup(HISTORY_FILE_VAR).unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string()),
        );
        let auto_save = lookup(AUTO_SAVE_VAR).map_or(Ok(true), |v| parse_bool(AUTO_SAVE_VAR, &v));
        let max_history = lookup(MAX_HISTORY_VAR)
            .map_or(Ok(DEFAULT_MAX_HISTORY), |v| parse_positive(MAX_HISTORY_VAR, &v));

        let checks = vec![check(&history_file), check(&auto_save), check(&max_history)];
        if let Validation::Failure(issues) = Validation::all_vec(checks) {
            return Err(ConfigError::Invalid(issues.iter().cloned().collect()));
        }

        Ok(Self {
            history_file: history_file?,
            auto_save: auto_save?,
            max_history: max_history?,
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let unreadable = |source: dotenvy::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: source.to_string(),
    };
    dotenvy::from_path_iter(path)
        .map_err(unreadable)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(unreadable)
}

fn check<T>(parsed: &Result<T, ConfigIssue>) -> Validation<(), NonEmptyVec<ConfigIssue>> {
    match parsed {
        Ok(_) => Validation::success(()),
        Err(issue) => Validation::fail(issue.clone()),
    }
}

fn parse_path(key: &'static str, value: String) -> Result<PathBuf, ConfigIssue> {
    if value.trim().is_empty() {
        return Err(ConfigIssue::Empty { key });
    }
    Ok(PathBuf::from(value.trim()))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigIssue> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigIssue::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<NonZeroUsize, ConfigIssue> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigIssue::InvalidInteger {
            key,
            value: value.to_string(),
        })?;
    usize::try_from(parsed)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(ConfigIssue::NotPositive { key, value: parsed })
}
