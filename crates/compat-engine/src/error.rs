//! Error types for engine and harness operations.
//!
//! Everything in this module is a harness-level failure: the engine could not
//! produce output for a probe at all. A probe that raises inside the page is
//! not an error here; the synthesized page records it as the `exception`
//! token and it is compared like any other output.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The main error type for engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to launch the browser process.
    ///
    /// This typically occurs when Chrome/Chromium is not installed,
    /// or when there are permission issues with the executable.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        /// Human-readable reason for the launch failure
        reason: String,
        /// Optional underlying error that caused the failure
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to open or talk to a session over the DevTools protocol.
    #[error("CDP connection failed: {0}")]
    ConnectionFailed(String),

    /// The engine could not load the synthesized page for a probe.
    #[error("engine failed to load page for '{probe}': {reason}")]
    LoadFailed {
        /// Id of the probe whose page failed to load
        probe: String,
        /// Reason for the load failure
        reason: String,
    },

    /// A wait condition was not satisfied within the timeout.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        /// Description of the condition that timed out
        condition: String,
        /// How long we waited before timing out
        timeout: Duration,
    },

    /// The whole probe transaction exceeded its deadline.
    #[error("probe '{probe}' did not finish within {timeout:?}")]
    CaseTimeout {
        /// Id of the probe that hung
        probe: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },

    /// JavaScript execution in the page context failed.
    #[error("JavaScript execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// An operation was attempted on a closed engine.
    #[error("engine is already closed")]
    AlreadyClosed,

    /// A recorded report could not be read or parsed.
    #[error("failed to read report {path}: {message}")]
    Report {
        /// Report file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Wraps errors from the chromiumoxide library.
    #[error("chromiumoxide error: {0}")]
    ChromiumOxide(#[from] chromiumoxide::error::CdpError),

    /// Generic I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
