//! Command-line interface definition for `compat`.
//!
//! - `compat run` - execute the matrix against an engine
//! - `compat check` - load and validate suites without running them
//! - `compat list` - print probes with their resolved expectations

mod commands;
mod validation;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{CheckArgs, Command, ListArgs, RunArgs, SelectionArgs};
pub use validation::{TargetSelection, parse_target};

/// compat - browser compatibility matrix harness
#[derive(Parser, Debug)]
#[command(
    name = "compat",
    version,
    about = "Run browser compatibility matrices against a headless engine",
    long_about = "Probes a headless browser engine with tiny synthesized pages and compares\n\
                  what each page logs against per-environment expectation tables."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to ./compat.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}
