//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single invalid setting
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("Invalid boolean value for {key}: '{value}'. Use 'true' or 'false'")]
    InvalidBool { key: &'static str, value: String },

    #[error("Invalid integer value for {key}: '{value}'")]
    InvalidInteger { key: &'static str, value: String },

    #[error("{key} must be a positive integer, got {value}")]
    NotPositive { key: &'static str, value: i64 },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more settings are invalid; every problem is listed
    #[error("Invalid configuration: {}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    /// The settings file exists but could not be read or parsed
    #[error("Cannot read settings file '{}': {message}", path.display())]
    EnvFile { path: PathBuf, message: String },
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigIssue> for ConfigError {
    fn from(issue: ConfigIssue) -> Self {
        Self::Invalid(vec![issue])
    }
}
