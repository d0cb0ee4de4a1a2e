//! Command implementations for the `compat` CLI.
//!
//! - [`run`] - execute the matrix
//! - [`check`] - validate suites
//! - [`list`] - print probes and resolved expectations
//!
//! Each command exposes an `execute` function taking its parsed arguments
//! and the global `--config` path.

pub mod check;
pub mod list;
pub mod run;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use list::execute as list_execute;
pub use run::execute as run_execute;
