use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::validation::{TargetSelection, parse_target};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the matrix against an engine
    ///
    /// Every selected probe is synthesized into a page, loaded in a fresh or
    /// reset engine session, and its logged output compared against the
    /// expectation resolved for the target. Exits non-zero if any case fails.
    Run(RunArgs),

    /// Load and validate suites without running them
    ///
    /// Reports authoring errors (missing DEFAULT, unknown environment tags,
    /// invalid probe names, duplicate probes) and prints per-kind counts.
    Check(CheckArgs),

    /// Print probes with their resolved expectations
    List(ListArgs),
}

/// Which suites and probes to load.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// Suite file or directory (repeatable; overrides `suites` in config)
    #[arg(short, long, value_name = "PATH")]
    pub suite: Vec<PathBuf>,

    /// Only probes whose id (`kind:name[:property]`) matches this regex
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Target environment tag (DEFAULT, CHROME, EDGE, FF, FF_ESR, IE) or `all`
    #[arg(short, long, value_name = "TARGET", value_parser = parse_target)]
    pub target: Option<TargetSelection>,

    /// Probes in flight at once
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: Option<u32>,

    /// Completion wait per page, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Open a fresh session per probe instead of resetting pooled ones
    #[arg(long)]
    pub fresh_sessions: bool,

    /// Show the browser window
    #[arg(long, conflicts_with = "replay")]
    pub headed: bool,

    /// Write the run reports as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Replay output recorded in a JSON report instead of launching Chrome
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Resolve expectations for this target (or `all`)
    #[arg(short, long, value_name = "TARGET", value_parser = parse_target)]
    pub target: Option<TargetSelection>,
}
