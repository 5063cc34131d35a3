//! Interactive terminal front end.
//!
//! Reads questions from stdin and prints the persona's replies until
//! `exit`, `quit`, or end of input.

use anyhow::{Context, Result};
use parley_config::Settings;
use parley_server::{connect, repl};
use tokio::io::{stdin, stdout, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .compact()
        .init();

    let settings = Settings::from_env().context("failed to load configuration")?;
    let relay = connect(&settings).await?;

    repl::run(&relay, BufReader::new(stdin()), stdout()).await?;

    Ok(())
}
