//! Interactive read-eval-print loop.

mod command;
mod completion;

pub use command::{help_text, parse_command, Command, InputError, ValidationError, SPECIAL_COMMANDS};
pub use completion::CommandCompleter;

use crate::calculator::{Calculator, Outcome};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use tracing::debug;

const PROMPT: &str = ">>> ";

const BANNER: &str = "================================\n   \
                      Welcome to the Calculator!\n\
                      ================================\n\
                      Type 'help' for available commands.\n\
                      Type 'exit' to quit.";

/// Run the REPL until `exit`, end of input or Ctrl-C.
///
/// Command errors are printed and the loop continues; only a failure of the
/// terminal itself ends it with an error.
pub fn run(calculator: &mut Calculator) -> rustyline::Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(true)
        .build();
    let mut editor: Editor<CommandCompleter, DefaultHistory> = Editor::with_config(config)?;
    editor.set_helper(Some(CommandCompleter));

    println!("{BANNER}");
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        };
        if line.trim().is_empty() {
            continue;
        }

        debug!(input = %line.trim(), "command");
        match calculator.process_line(&line) {
            Ok(Outcome::Continue(message)) => println!("{message}"),
            Ok(Outcome::Exit) => break,
            Err(err) => println!("Error: {err}"),
        }
        if let Some(err) = calculator.take_auto_save_error() {
            println!("Warning: auto-save failed: {err}");
        }
    }

    println!("Goodbye!");
    Ok(())
}
