#![deny(missing_docs)]

//! # CDD Paramcheck CLI
//!
//! Command Line Interface for validating request parameters against an
//! OpenAPI contract.
//!
//! Supported Commands:
//! - `check`: Validates the cookies of a described request.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod check;
mod error;

use crate::error::CliResult;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI parameter checker")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate request cookies against the matching operation.
    Check(check::CheckArgs),
}

fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Check(args) => {
            let report = check::execute(args)?;
            check::render(&report, args.json, &mut std::io::stdout().lock())?;
            Ok(if report.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_cookies() {
        let cli = Cli::try_parse_from([
            "cdd-paramcheck",
            "check",
            "--spec",
            "api.yaml",
            "--path",
            "/pets",
            "--cookie",
            "a=1",
            "--cookie",
            "b=2",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command;
        assert_eq!(args.cookies, vec!["a=1", "b=2"]);
        assert_eq!(args.method, "GET");
    }
}
