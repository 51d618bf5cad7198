//! Signal REPL.
//!
//! Reads commands from stdin, one per line, and executes them against a
//! signal registry. Signal values and graphs are reported through the logger,
//! the same way the actors report their own updates.

use std::io::Write;

use acton_reactive::prelude::*;
use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, error, warn};
use tracing_subscriber::FmtSubscriber;

use signal_kernel::SignalRegistry;
use signal_repl::parser;

#[derive(Parser)]
#[command(name = "signal-repl")]
#[command(version)]
#[command(about = "Interactive functional-reactive signal runtime")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let mut runtime = ActonApp::launch_async().await;
    let mut registry = SignalRegistry::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input.is_empty() {
            prompt()?;
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        match parser::parse(input) {
            Ok(command) => {
                if let Err(e) = registry.execute(&mut runtime, command).await {
                    warn!(error = %e, "command failed");
                }
            }
            Err(e) => warn!(error = %e, "could not parse command"),
        }

        prompt()?;
    }

    if let Err(e) = runtime.shutdown_all().await {
        error!(error = ?e, "shutdown reported errors");
    }
    Ok(())
}
