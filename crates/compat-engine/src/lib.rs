//! # compat-engine
//!
//! Drives an engine under test through a compatibility matrix.
//!
//! ## Architecture
//!
//! - **PageSynthesizer**: builds one self-contained page per probe
//! - **Engine / EngineSession**: the boundary to whatever executes pages
//! - **ChromiumEngine**: headless Chrome via chromiumoxide, one tab per session
//! - **ReplayEngine**: replays output recorded in an earlier run report
//! - **SessionPool**: scoped, single-writer session checkout with reset
//! - **ProbeExecutor**: synthesize, run with a deadline, collect
//! - **MatrixRunner**: concurrent execution of a catalog into a `RunReport`
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use compat_engine::{ChromiumConfig, ChromiumEngine, MatrixRunner, RunOptions};
//! use compat_matrix::{Catalog, TargetEnv};
//!
//! let catalog = Catalog::load(&["suites"])?;
//! let engine = Arc::new(ChromiumEngine::launch(ChromiumConfig::default()).await?);
//! let runner = MatrixRunner::new(engine.clone(), RunOptions::default());
//!
//! let report = runner.run(&catalog, TargetEnv::Chrome).await;
//! assert!(report.is_success());
//!
//! engine.close().await?;
//! ```
//!
//! Tests that need a real browser are `#[ignore]`; run them with
//! `cargo test -- --ignored` on a machine with Chrome installed.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod chromium;
pub mod console;
pub mod engine;
pub mod error;
pub mod executor;
pub mod pool;
pub mod replay;
pub mod report;
pub mod runner;
pub mod synth;
pub mod wait;

pub use chromium::{ChromiumConfig, ChromiumEngine, ChromiumSession};
pub use console::{ConsoleCapture, ConsoleLevel, ConsoleMessage};
pub use engine::{Engine, EngineSession, PageRun};
pub use error::{EngineError, Result};
pub use executor::{ExecutionResult, ProbeExecutor};
pub use pool::{PooledSession, SessionPool};
pub use replay::{ReplayEngine, ReplaySession};
pub use report::{read_reports, write_reports, CaseReport, CaseStatus, RunReport, RunSummary};
pub use runner::{MatrixRunner, RunOptions, DEFAULT_CONCURRENCY};
pub use synth::{PageSynthesizer, SynthesizedPage};
pub use wait::{WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
