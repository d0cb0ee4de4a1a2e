//! Error types for the `compat` CLI.
//!
//! Library errors ([`MatrixError`], [`EngineError`]) convert into [`CliError`]
//! via `#[from]`; `main` renders the result through miette.

use std::path::PathBuf;

use compat_engine::EngineError;
use compat_matrix::MatrixError;
use miette::Report;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authoring error in a suite file. Aborts before anything runs.
    #[error("Suite error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The filter (or the suites) left nothing to run.
    #[error("No probes selected\n\nHint: Check --suite paths and the --filter pattern")]
    NoProbes,

    /// At least one case mismatched or hit a harness-level error.
    #[error("{failed} of {total} cases failed")]
    RunFailed {
        /// Mismatches plus harness errors, across all targets
        failed: usize,
        /// Cases executed, across all targets
        total: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create compat.toml or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// figment could not merge or extract the configuration.
    #[error("{0}\n\nHint: Check compat.toml and COMPAT_* environment variables")]
    Extract(String),

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(err.to_string())
    }
}

/// Convert a CliError into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Matrix(MatrixError::DuplicateProbe { id, first, second }) => miette::miette!(
            "Probe '{}' is defined twice\n  first:  {}\n  second: {}\n\nHint: Probe ids are <kind>:<name>[:<property>] and must be unique across suites",
            id,
            first,
            second
        ),
        CliError::Matrix(MatrixError::MissingExpectation { probe }) => miette::miette!(
            "Probe '{}' has no DEFAULT expectation\n\nHint: Add a DEFAULT entry to its expect table",
            probe
        ),
        CliError::Engine(EngineError::LaunchFailed { reason, .. }) => miette::miette!(
            "Failed to launch Chrome: {}\n\nHint: Install Chrome/Chromium, set browser.chrome_path, or use --replay <report>",
            reason
        ),
        _ => miette::miette!("{}", err),
    }
}
