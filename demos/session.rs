//! Calculator Session
//!
//! This example drives the calculator facade the way the REPL does, without
//! a terminal.
//!
//! Key concepts:
//! - Exact decimal results recorded in history
//! - Undo/redo over history snapshots
//! - Auto-save to a CSV file after every calculation
//! - Restoring the saved history on the next start
//!
//! Run with: cargo run --example session

use tally::calculator::{Calculator, Outcome};
use tally::config::CalculatorConfig;

fn run(calculator: &mut Calculator, line: &str) {
    println!(">>> {line}");
    match calculator.process_line(line) {
        Ok(Outcome::Continue(message)) => println!("{message}"),
        Ok(Outcome::Exit) => println!("Goodbye!"),
        Err(err) => println!("Error: {err}"),
    }
    if let Some(err) = calculator.take_auto_save_error() {
        println!("Warning: auto-save failed: {err}");
    }
}

fn main() -> anyhow::Result<()> {
    println!("=== Calculator Session Example ===\n");

    let dir = tempfile::tempdir()?;
    let config = CalculatorConfig {
        history_file: dir.path().join("history.csv"),
        auto_save: true,
        ..CalculatorConfig::default()
    };

    println!("--- First session ---");
    let mut calculator = Calculator::open(config.clone())?;
    for line in [
        "add 10 5",
        "power 2 8",
        "divide 1 0",
        "undo",
        "redo",
        "root 27 3",
        "history",
    ] {
        run(&mut calculator, line);
    }
    run(&mut calculator, "exit");

    println!("\n--- Second session ---");
    let mut calculator = Calculator::open(config)?;
    println!("Restored {} calculation(s)", calculator.history().len());
    run(&mut calculator, "history");

    Ok(())
}
