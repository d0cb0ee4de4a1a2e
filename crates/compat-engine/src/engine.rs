//! The engine-under-test boundary.
//!
//! An [`Engine`] opens sessions configured for one target environment. A
//! session loads one synthesized page at a time, waits for the probe to
//! complete and returns what the page logged. Sessions are single-writer:
//! loading a page replaces the session's document and global scope.

use async_trait::async_trait;
use compat_matrix::TargetEnv;

use crate::console::ConsoleMessage;
use crate::error::Result;
use crate::synth::SynthesizedPage;
use crate::wait::WaitConfig;

/// Output of one page run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRun {
    /// Values appended to the logging sink, in emission order.
    pub emitted: Vec<String>,
    /// Console traffic observed while the page ran.
    pub console: Vec<ConsoleMessage>,
}

impl PageRun {
    #[must_use]
    pub fn new(emitted: Vec<String>) -> Self {
        Self {
            emitted,
            console: Vec::new(),
        }
    }
}

#[async_trait]
pub trait Engine: Send + Sync {
    type Session: EngineSession;

    /// Short name used in reports and logs.
    fn name(&self) -> &str;

    /// Opens a fresh, isolated session emulating `env`.
    async fn open_session(&self, env: TargetEnv) -> Result<Self::Session>;
}

#[async_trait]
pub trait EngineSession: Send {
    /// Loads `page`, waits (bounded by `wait`) for the probe to finish and
    /// returns the logged output.
    ///
    /// # Errors
    ///
    /// Any error is a harness-level failure: the page did not load or never
    /// signalled completion.
    async fn run(&mut self, page: &SynthesizedPage, wait: WaitConfig) -> Result<PageRun>;

    /// Returns the session to a clean state so the next page cannot observe
    /// anything left behind by the previous one.
    async fn reset(&mut self) -> Result<()>;

    /// Releases engine resources held by the session.
    async fn close(&mut self) -> Result<()>;
}
