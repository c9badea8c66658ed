mod cli;
mod distance;
mod error;
mod matrix;
mod model;
mod output;
mod reader;

use crate::error::Result;
use clap::Parser;
use miette::IntoDiagnostic;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Compute pairwise genetic distances between the samples of a variant database.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Variant database (SQLite).
    #[arg(value_hint = clap::ValueHint::FilePath)]
    db: PathBuf,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Number of threads for the pairwise computation.
    #[arg(short, long)]
    threads: Option<NonZeroUsize>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let run_spec = cli::build_run_spec(&args);
    run_spec.log_paths();

    let mut reader = run_spec.open_reader()?;
    cli::run(reader.as_mut(), run_spec.output(), run_spec.threads())?;
    Ok(())
}

fn main() -> miette::Result<()> {
    try_main().into_diagnostic()
}
