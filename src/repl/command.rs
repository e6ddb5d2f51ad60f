//! Parsing and validation of REPL input.
//!
//! Input is checked before anything is evaluated: the command word must be
//! known, an operation needs exactly two operands and both must be numbers.
//! All problems in a line are reported together.

use crate::core::{supported_operations, Operation};
use rust_decimal::Decimal;
use std::str::FromStr;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Commands that take no arguments, with their help descriptions.
pub const SPECIAL_COMMANDS: [(&str, &str); 8] = [
    ("help", "Show this help message (also '?')"),
    ("history", "Show calculation history"),
    ("clear", "Clear calculation history"),
    ("undo", "Undo last action"),
    ("redo", "Redo last undone action"),
    ("save", "Save history to CSV"),
    ("load", "Load history from CSV"),
    ("exit", "Exit the calculator"),
];

/// One parsed line of input.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    History,
    Clear,
    Undo,
    Redo,
    Save,
    Load,
    Exit,
    Calculate {
        operation: Operation,
        a: Decimal,
        b: Decimal,
    },
}

/// A single problem with a line of input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a command. Type 'help' for available commands")]
    Empty,

    #[error("Unknown command '{name}'. Available operations: {operations}")]
    UnknownCommand { name: String, operations: String },

    #[error("'{command}' takes no arguments")]
    UnexpectedArguments { command: String },

    #[error("Invalid format. Please use: {operation} <number1> <number2> (got {found} operand(s))")]
    WrongArity { operation: Operation, found: usize },

    #[error("'{value}' is not a valid number")]
    InvalidNumber { value: String },
}

/// Errors produced when a line of input is rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    /// Every problem found in the line
    #[error("{}", format_problems(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FromStr for Command {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse_command(line)
    }
}

/// Parse and validate one line of input.
///
/// # Example
///
/// ```rust
/// use tally::core::Operation;
/// use tally::repl::{parse_command, Command};
/// use rust_decimal::Decimal;
///
/// let command = parse_command("power 2 8").unwrap();
/// assert_eq!(
///     command,
///     Command::Calculate { operation: Operation::Power, a: Decimal::from(2), b: Decimal::from(8) }
/// );
///
/// assert!(parse_command("add five 3").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Err(InputError::Invalid(vec![ValidationError::Empty]));
    };
    let word = first.to_ascii_lowercase();
    let args: Vec<&str> = tokens.collect();

    if let Some(command) = special_command(&word) {
        if !args.is_empty() {
            return Err(InputError::Invalid(vec![
                ValidationError::UnexpectedArguments { command: word },
            ]));
        }
        return Ok(command);
    }

    let Ok(operation) = word.parse::<Operation>() else {
        return Err(InputError::Invalid(vec![ValidationError::UnknownCommand {
            name: first.to_string(),
            operations: supported_operations().join(", "),
        }]));
    };

    let operands: Vec<Result<Decimal, ValidationError>> =
        args.iter().map(|raw| parse_number(raw)).collect();

    let mut checks = vec![ensure(args.len() == 2, || ValidationError::WrongArity {
        operation,
        found: args.len(),
    })];
    checks.extend(operands.iter().map(check_operand));

    if let Validation::Failure(problems) = Validation::all_vec(checks) {
        return Err(InputError::Invalid(problems.iter().cloned().collect()));
    }

    match operands.as_slice() {
        [Ok(a), Ok(b)] => Ok(Command::Calculate {
            operation,
            a: *a,
            b: *b,
        }),
        _ => Err(InputError::Invalid(vec![ValidationError::WrongArity {
            operation,
            found: operands.len(),
        }])),
    }
}

/// Multi-line help text listing commands and operations.
pub fn help_text() -> String {
    let mut lines = vec![
        "=== Calculator Help ===".to_string(),
        String::new(),
        "Usage: <operation> <number1> <number2>".to_string(),
        String::new(),
        format!("Operations: {}", supported_operations().join(", ")),
        String::new(),
        "Examples:".to_string(),
        "  add 5 3        => 5 + 3 = 8".to_string(),
        "  subtract 10 4  => 10 - 4 = 6".to_string(),
        "  multiply 6 7   => 6 * 7 = 42".to_string(),
        "  divide 20 4    => 20 / 4 = 5".to_string(),
        "  power 2 8      => 2 ^ 8 = 256".to_string(),
        "  root 9 2       => 9 √ 2 = 3".to_string(),
        String::new(),
        "Special commands:".to_string(),
    ];
    lines.extend(
        SPECIAL_COMMANDS
            .iter()
            .map(|(name, description)| format!("  {name:<10} - {description}")),
    );
    lines.join("\n")
}

fn special_command(word: &str) -> Option<Command> {
    let command = match word {
        "help" | "?" => Command::Help,
        "history" => Command::History,
        "clear" => Command::Clear,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "save" => Command::Save,
        "load" => Command::Load,
        "exit" | "quit" => Command::Exit,
        _ => return None,
    };
    Some(command)
}

fn parse_number(raw: &str) -> Result<Decimal, ValidationError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ValidationError::InvalidNumber {
            value: raw.to_string(),
        })
}

fn check_operand(
    operand: &Result<Decimal, ValidationError>,
) -> Validation<(), NonEmptyVec<ValidationError>> {
    match operand {
        Ok(_) => Validation::success(()),
        Err(problem) => Validation::fail(problem.clone()),
    }
}

fn ensure<F>(condition: bool, problem: F) -> Validation<(), NonEmptyVec<ValidationError>>
where
    F: FnOnce() -> ValidationError,
{
    if condition {
        Validation::success(())
    } else {
        Validation::fail(problem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems(line: &str) -> Vec<ValidationError> {
        match parse_command(line) {
            Err(InputError::Invalid(problems)) => problems,
            Ok(command) => panic!("expected rejection, got {command:?}"),
        }
    }

    #[test]
    fn parses_special_commands_case_insensitively() {
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("  HISTORY ").unwrap(), Command::History);
        assert_eq!(parse_command("Undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("exit").unwrap(), Command::Exit);
    }

    #[test]
    fn parses_calculation() {
        assert_eq!(
            "divide 7.5 -2.5".parse::<Command>().unwrap(),
            Command::Calculate {
                operation: Operation::Divide,
                a: Decimal::new(75, 1),
                b: Decimal::new(-25, 1),
            }
        );
    }

    #[test]
    fn accepts_scientific_notation() {
        let Command::Calculate { a, .. } = parse_command("add 1e3 1").unwrap() else {
            panic!("expected calculation");
        };
        assert_eq!(a, Decimal::from(1000));
    }

    #[test]
    fn empty_line_is_rejected() {
        assert_eq!(problems("   "), vec![ValidationError::Empty]);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let found = problems("modulo 5 3");
        assert!(matches!(
            &found[..],
            [ValidationError::UnknownCommand { name, .. }] if name == "modulo"
        ));
    }

    #[test]
    fn special_command_with_arguments_is_rejected() {
        assert_eq!(
            problems("undo 3"),
            vec![ValidationError::UnexpectedArguments {
                command: "undo".to_string()
            }]
        );
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert_eq!(
            problems("add 5"),
            vec![ValidationError::WrongArity {
                operation: Operation::Add,
                found: 1
            }]
        );
    }

    #[test]
    fn all_problems_are_reported_together() {
        let found = problems("add five 3 x");
        assert_eq!(found.len(), 3);
        assert!(found.contains(&ValidationError::InvalidNumber {
            value: "five".to_string()
        }));
        assert!(found.contains(&ValidationError::InvalidNumber {
            value: "x".to_string()
        }));
    }

    #[test]
    fn help_lists_every_command_and_operation() {
        let help = help_text();
        for (name, _) in SPECIAL_COMMANDS {
            assert!(help.contains(name), "missing {name}");
        }
        assert!(help.contains("add, subtract, multiply, divide, power, root"));
    }
}
