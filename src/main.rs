use anyhow::Context;
use tally::calculator::Calculator;
use tally::config::CalculatorConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = CalculatorConfig::from_env().context("failed to read configuration")?;
    tracing::debug!(?config, "configuration loaded");

    // Refuse to start on an unreadable history file: auto-save would
    // otherwise overwrite it with a fresh history.
    let mut calculator = Calculator::open(config).with_context(|| {
        "failed to load history file; fix or remove it, or point HISTORY_FILE elsewhere"
    })?;

    tally::repl::run(&mut calculator).context("terminal error")?;
    Ok(())
}
