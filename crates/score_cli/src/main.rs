//! score-helm CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or missing input
//! - 3: Validation failure
//! - 4: Conversion error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use score_helm::HelmError;
use score_spec::SpecError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const CONVERSION_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Diagnostics go to stderr so stdout only carries the values document.
/// Returns `false` when a subscriber was already installed.
fn init_logging(verbose: bool) -> bool {
    let default_directives = if verbose {
        "score_cli=debug,score_spec=debug,score_helm=debug,info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(spec_error) = cause.downcast_ref::<SpecError>() {
            return match spec_error {
                SpecError::ValidationFailed(_) | SpecError::Decode(_) => {
                    ExitCodes::VALIDATION_FAILURE
                }
                SpecError::NotFound(_) | SpecError::InvalidPath { .. } => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<HelmError>().is_some() {
            return ExitCodes::CONVERSION_ERROR;
        }
    }

    if e.to_string().contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
