//! Command-line interface for the carpool routing engine.
//!
//! `carpool solve <request.json>` reads a JSON solve request, resolves
//! distances either from a local matrix file or a Distance Matrix service,
//! and prints the routes. Solver failures are printed as a structured
//! `{kind, message}` body on stdout before the command exits non-zero.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod logging;
mod solve;

pub use error::CliError;
pub use logging::LogLevel;
pub use solve::OutputFormat;

use solve::{SolveArgs, run_solve};

const ARG_SOLVE_REQUEST: &str = "request-path";
const ARG_SOLVE_MATRIX: &str = "matrix";
const ARG_SOLVE_MAPS_BASE_URL: &str = "maps-base-url";
const ARG_SOLVE_MAPS_API_KEY: &str = "maps-api-key";
const ARG_SOLVE_FORMAT: &str = "format";
const ARG_LOG_LEVEL: &str = "log-level";
const ENV_SOLVE_REQUEST: &str = "CARPOOL_CMDS_SOLVE_REQUEST_PATH";
const ENV_SOLVE_MAPS_API_KEY: &str = "CARPOOL_CMDS_SOLVE_MAPS_API_KEY";

/// Run the carpool CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Solve(args) => run_solve(*args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "carpool",
    about = "Plan carpool pickup routes to a shared destination",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assign passengers to drivers and order every pickup route.
    Solve(Box<SolveArgs>),
}

#[cfg(test)]
mod tests;
