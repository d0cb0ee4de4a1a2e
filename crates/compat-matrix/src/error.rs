//! Error types for suite loading and expectation resolution.
//!
//! Everything here is an authoring error: the suite itself cannot be trusted,
//! so callers abort before any probe is executed.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Debug, Error)]
pub enum MatrixError {
    /// A probe declares no `DEFAULT` expectation.
    #[error("probe '{probe}' has no DEFAULT expectation")]
    MissingExpectation { probe: String },

    #[error("unknown target environment '{0}' (expected one of DEFAULT, CHROME, EDGE, FF, FF_ESR, IE)")]
    UnknownEnvironment(String),

    /// Two keys of one `expect` table name the same environment, e.g. `FF`
    /// and `FIREFOX`.
    #[error("probe '{probe}' lists environment '{tag}' more than once")]
    DuplicateEnvironment { probe: String, tag: String },

    #[error("invalid {kind} probe name '{name}': {hint}")]
    InvalidProbeName {
        kind: String,
        name: String,
        hint: String,
    },

    #[error("invalid CSS property '{0}' for style probe")]
    InvalidProperty(String),

    #[error("duplicate probe id '{id}' (first declared in {first}, again in {second})")]
    DuplicateProbe {
        id: String,
        first: String,
        second: String,
    },

    #[error("probe '{0}' is not in the catalog")]
    UnknownProbe(String),

    #[error("failed to parse suite {path}: {message}")]
    SuiteParse { path: PathBuf, message: String },

    #[error("unsupported suite format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("suite path not found: {0}")]
    SuiteNotFound(PathBuf),

    #[error("invalid probe filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
