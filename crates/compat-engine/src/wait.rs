//! Bounded waiting for page lifecycle conditions.
//!
//! The only suspension point of a probe is the wait for the synthesized page
//! to signal completion. Conditions are polled at a fixed interval until they
//! hold or the timeout expires.

use crate::error::{EngineError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default timeout for wait operations (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default poll interval for checking conditions (50ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for wait operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition.
    pub timeout: Duration,

    /// How often to check if the condition is satisfied.
    pub poll_interval: Duration,
}

impl WaitConfig {
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with custom timeout and default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Waits for a condition that returns a `Result<bool>`.
///
/// Errors from the condition are treated as "not yet": while a navigation is
/// committing, evaluation against the old document can fail transiently.
/// Only the timeout ends the wait unsuccessfully.
///
/// # Errors
///
/// Returns `WaitTimeout` naming `description` once `config.timeout` elapses.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();

    loop {
        if let Ok(true) = condition().await {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(EngineError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_immediately() {
        let result = wait_for_result(|| async { Ok(true) }, WaitConfig::default(), "ready").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn retries_through_transient_errors() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for_result(
            move || {
                let c = counter_clone.clone();
                async move {
                    match c.fetch_add(1, Ordering::SeqCst) {
                        0 => Err(EngineError::ScriptExecutionFailed("navigating".into())),
                        1 => Ok(false),
                        _ => Ok(true),
                    }
                }
            },
            WaitConfig::new(Duration::from_secs(5), Duration::from_millis(1)),
            "probe done",
        )
        .await;

        assert!(result.is_ok());
        assert!(counter.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn times_out_with_condition_name() {
        let result = wait_for_result(
            || async { Ok(false) },
            WaitConfig::new(Duration::from_millis(50), Duration::from_millis(5)),
            "probe done",
        )
        .await;

        match result {
            Err(EngineError::WaitTimeout { condition, timeout }) => {
                assert_eq!(condition, "probe done");
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
