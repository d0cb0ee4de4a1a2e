//! The probe executor: synthesize, run on a pooled session, collect.

use std::time::{Duration, Instant};

use compat_matrix::ProbeCase;
use tokio::time::timeout_at;
use tracing::debug;

use crate::console::ConsoleMessage;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::pool::SessionPool;
use crate::synth::PageSynthesizer;
use crate::wait::WaitConfig;

/// Output of one probe execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub probe_id: String,
    pub emitted: Vec<String>,
    pub console: Vec<ConsoleMessage>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeExecutor {
    synthesizer: PageSynthesizer,
    wait: WaitConfig,
    case_timeout: Duration,
}

impl ProbeExecutor {
    /// `case_timeout` bounds the whole transaction on the engine, from
    /// opening a session to the completion wait; it should exceed
    /// `wait.timeout`.
    #[must_use]
    pub fn new(wait: WaitConfig, case_timeout: Duration) -> Self {
        Self {
            synthesizer: PageSynthesizer::new(),
            wait,
            case_timeout,
        }
    }

    /// Runs `case` on a session from `pool`.
    ///
    /// # Errors
    ///
    /// Returns a harness-level error if no session could be opened, the page
    /// failed to load, or the run exceeded the case timeout. The session is
    /// discarded on every error path.
    pub async fn execute<E: Engine>(
        &self,
        pool: &SessionPool<E>,
        case: &ProbeCase,
    ) -> Result<ExecutionResult> {
        let page = self.synthesizer.synthesize(case);
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.case_timeout;

        // Opening a session counts against the same deadline as the run.
        let mut session = match timeout_at(deadline, pool.acquire()).await {
            Ok(acquired) => acquired?,
            Err(_) => return Err(self.timed_out(page.probe_id)),
        };

        match timeout_at(deadline, session.run(&page, self.wait)).await {
            Ok(Ok(run)) => {
                session.release().await;
                debug!("{} emitted {:?}", page.probe_id, run.emitted);
                Ok(ExecutionResult {
                    probe_id: page.probe_id,
                    emitted: run.emitted,
                    console: run.console,
                    duration: started.elapsed(),
                })
            }
            Ok(Err(e)) => {
                session.discard().await;
                Err(e)
            }
            Err(_) => {
                session.discard().await;
                Err(self.timed_out(page.probe_id))
            }
        }
    }

    fn timed_out(&self, probe: String) -> EngineError {
        EngineError::CaseTimeout {
            probe,
            timeout: self.case_timeout,
        }
    }
}
