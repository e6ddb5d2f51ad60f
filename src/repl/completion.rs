//! Tab completion for command and operation names.

use super::command::SPECIAL_COMMANDS;
use crate::core::supported_operations;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// Completes the first word of a line against every known command.
#[derive(Debug, Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    fn candidates(prefix: &str) -> Vec<Pair> {
        let mut names: Vec<&str> = SPECIAL_COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .chain(supported_operations())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort_unstable();
        names
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{name} "),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let prefix = &line[..pos];
        // Only the command word is completed; operands are free-form.
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((0, Self::candidates(&prefix.to_ascii_lowercase())))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}
