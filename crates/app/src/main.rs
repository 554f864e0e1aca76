//! Sentinel - command-line entry point
//!
//! Loads configuration, wires the adapters around the request pipeline
//! and runs a single command.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use sentinel_infrastructure::{DEFAULT_FILTER, init_tracing, load_config};

use crate::cli::Cli;
use crate::commands::{AppError, build_pipeline, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { DEFAULT_FILTER });

    match start(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    let pipeline = build_pipeline(config).await?;
    let mut stdout = std::io::stdout().lock();
    run(&pipeline, cli.command, &mut stdout).await
}
