//! Runs a whole catalog against one target environment.
//!
//! Cases are independent transactions (synthesize, execute, compare) and run
//! concurrently up to `concurrency`. A failure in one case is recorded in its
//! report and never stops the others.

use std::sync::Arc;
use std::time::{Duration, Instant};

use compat_matrix::{Catalog, ProbeCase, TargetEnv};
use futures::StreamExt;
use tracing::{info, warn};

use crate::engine::Engine;
use crate::executor::ProbeExecutor;
use crate::pool::SessionPool;
use crate::report::{CaseReport, RunReport};
use crate::wait::{WaitConfig, DEFAULT_TIMEOUT};

/// Default number of probes in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Tuning for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Probes (and sessions) in flight at once.
    pub concurrency: usize,
    /// Wait for a page to signal completion.
    pub wait: WaitConfig,
    /// Hard deadline for one probe, from opening a session to read-back.
    pub case_timeout: Duration,
    /// Reset and reuse sessions instead of opening one per probe.
    pub reuse_sessions: bool,
}

impl RunOptions {
    /// Options with the given completion wait; the case deadline allows five
    /// extra seconds for navigation and read-back.
    #[must_use]
    pub fn with_wait(wait: WaitConfig) -> Self {
        Self {
            wait,
            case_timeout: wait.timeout + Duration::from_secs(5),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn reuse_sessions(mut self, reuse: bool) -> Self {
        self.reuse_sessions = reuse;
        self
    }

    #[must_use]
    pub fn case_timeout(mut self, case_timeout: Duration) -> Self {
        self.case_timeout = case_timeout;
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            wait: WaitConfig::default(),
            case_timeout: DEFAULT_TIMEOUT + Duration::from_secs(5),
            reuse_sessions: true,
        }
    }
}

pub struct MatrixRunner<E: Engine> {
    engine: Arc<E>,
    options: RunOptions,
}

impl<E: Engine> MatrixRunner<E> {
    pub fn new(engine: Arc<E>, options: RunOptions) -> Self {
        Self { engine, options }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub async fn run(&self, catalog: &Catalog, env: TargetEnv) -> RunReport {
        self.run_with_progress(catalog, env, |_| {}).await
    }

    /// Runs every case of `catalog` under `env`, calling `on_case` as each
    /// case completes (completion order). The returned report lists cases in
    /// catalog order.
    pub async fn run_with_progress<F>(
        &self,
        catalog: &Catalog,
        env: TargetEnv,
        on_case: F,
    ) -> RunReport
    where
        F: Fn(&CaseReport),
    {
        let started = Instant::now();
        let concurrency = self.options.concurrency.max(1);
        let pool = SessionPool::new(
            self.engine.clone(),
            env,
            concurrency,
            self.options.reuse_sessions,
        );
        let executor = ProbeExecutor::new(self.options.wait, self.options.case_timeout);

        info!(
            "Running {} probes against {} on {} ({} at a time)",
            catalog.len(),
            env,
            self.engine.name(),
            concurrency
        );

        let pool_ref = &pool;
        let executor_ref = &executor;
        let mut reports: Vec<(usize, CaseReport)> =
            futures::stream::iter(catalog.iter().enumerate())
                .map(move |(index, case)| async move {
                    (index, run_case(executor_ref, pool_ref, case, env).await)
                })
                .buffer_unordered(concurrency)
                .inspect(|(_, report)| on_case(report))
                .collect()
                .await;

        pool.shutdown().await;
        reports.sort_by_key(|(index, _)| *index);

        let report = RunReport::new(
            self.engine.name(),
            env,
            reports.into_iter().map(|(_, report)| report).collect(),
            started.elapsed(),
        );

        info!(
            "{}: {} passed, {} mismatched, {} harness errors ({} sessions opened)",
            env,
            report.summary.passed,
            report.summary.mismatched,
            report.summary.harness_errors,
            pool.sessions_opened()
        );

        report
    }
}

async fn run_case<E: Engine>(
    executor: &ProbeExecutor,
    pool: &SessionPool<E>,
    case: &ProbeCase,
    env: TargetEnv,
) -> CaseReport {
    let started = Instant::now();
    match executor.execute(pool, case).await {
        Ok(result) => CaseReport::from_execution(case, env, result),
        Err(e) => {
            warn!("{} on {}: {}", case.id(), env, e);
            CaseReport::harness_error(case, env, &e, started.elapsed())
        }
    }
}
