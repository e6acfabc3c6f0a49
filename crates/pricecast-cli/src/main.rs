mod analysis;
mod cli;
mod commands;
mod error;
mod metadata;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

const LOG_ENV: &str = "PRICECAST_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

// Logs go to stderr; stdout carries only envelopes.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let envelope = commands::run(&cli).await?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::render(&mut out, &envelope, cli.format, cli.pretty)?;
    out.flush()?;

    if cli.strict && (!envelope.meta.warnings.is_empty() || envelope.has_errors()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if envelope.has_errors() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
