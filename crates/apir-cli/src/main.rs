//! # apir CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apir_cli::analyse::{run_analyse, AnalyseArgs};
use apir_cli::merge::{run_merge, MergeArgs};
use apir_cli::regions::{run_regions, RegionsArgs};
use apir_cli::validate::{run_validate, ValidateArgs};

/// API regions toolchain.
///
/// Inspects region documents, merges configuration API documents, validates
/// feature configurations and analyses assembly snapshots.
#[derive(Parser, Debug)]
#[command(name = "apir", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a region document and list its regions.
    Regions(RegionsArgs),

    /// Merge configuration API documents in order.
    Merge(MergeArgs),

    /// Validate a feature's configurations against a configuration API.
    Validate(ValidateArgs),

    /// Run analyser tasks over an assembly snapshot.
    Analyse(AnalyseArgs),
}

fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = env_filter(cli.verbose);
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!("apir CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Regions(args) => run_regions(args),
        Commands::Merge(args) => run_merge(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Analyse(args) => run_analyse(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
