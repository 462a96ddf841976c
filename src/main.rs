//! Skol CLI - static checker for the Skol language

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use skol::cli::{log_filter, Cli, DebugTarget};

/// `SKOL_LOG` wins over `--debug`
fn init_tracing(targets: &[DebugTarget]) {
    let filter = match std::env::var("SKOL_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(log_filter(targets)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.debug);

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
