//! The `compat` command-line harness.
//!
//! Loads probe suites, runs them against headless Chrome (or a recorded
//! report) for one or more target environments, and reports mismatches.
//!
//! - [`cli`] - argument definitions
//! - [`config`] - layered configuration (defaults, `compat.toml`, `COMPAT_*`, CLI)
//! - [`commands`] - `run`, `check` and `list`
//! - [`error`] - error types and miette rendering
//! - [`logger`] - tracing setup
//! - [`ui`] - progress and diagnostics on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
