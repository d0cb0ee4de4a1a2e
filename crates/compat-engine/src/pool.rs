//! Scoped acquisition of engine sessions.
//!
//! A [`SessionPool`] hands out at most `max_sessions` sessions at a time, one
//! probe per session. With reuse enabled, a released session is reset and
//! parked for the next probe; a session that failed, timed out or could not
//! be reset is closed instead and never handed out again. Dropping a
//! [`PooledSession`] without releasing it discards the session, so a
//! cancelled probe frees its slot without leaking state into the pool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use compat_matrix::TargetEnv;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::engine::{Engine, EngineSession, PageRun};
use crate::error::{EngineError, Result};
use crate::synth::SynthesizedPage;
use crate::wait::WaitConfig;

/// Upper bound for resetting or closing a session.
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SessionPool<E: Engine> {
    engine: Arc<E>,
    env: TargetEnv,
    reuse: bool,
    idle: Mutex<Vec<E::Session>>,
    slots: Semaphore,
    opened: AtomicUsize,
}

impl<E: Engine> SessionPool<E> {
    /// Creates a pool for `env`. `max_sessions` is clamped to at least one.
    pub fn new(engine: Arc<E>, env: TargetEnv, max_sessions: usize, reuse: bool) -> Self {
        Self {
            engine,
            env,
            reuse,
            idle: Mutex::new(Vec::new()),
            slots: Semaphore::new(max_sessions.max(1)),
            opened: AtomicUsize::new(0),
        }
    }

    /// Waits for a free slot and returns a parked session or a new one.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` after [`SessionPool::shutdown`], or whatever
    /// the engine reports when opening a session fails.
    pub async fn acquire(&self) -> Result<PooledSession<'_, E>> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| EngineError::AlreadyClosed)?;

        let parked = if self.reuse {
            self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop()
        } else {
            None
        };

        let session = match parked {
            Some(session) => session,
            None => {
                let session = self.engine.open_session(self.env).await?;
                self.opened.fetch_add(1, Ordering::Relaxed);
                session
            }
        };

        Ok(PooledSession {
            pool: self,
            session: Some(session),
            _permit: permit,
        })
    }

    /// Number of sessions opened over the pool's lifetime.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Sessions parked for reuse.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Stops handing out sessions and closes the parked ones.
    pub async fn shutdown(&self) {
        self.slots.close();
        let parked =
            std::mem::take(&mut *self.idle.lock().unwrap_or_else(PoisonError::into_inner));
        debug!("Closing {} parked {} sessions", parked.len(), self.env);
        for mut session in parked {
            self.close_session(&mut session).await;
        }
    }

    async fn close_session(&self, session: &mut E::Session) {
        match timeout(DEFAULT_CLEANUP_TIMEOUT, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close {} session: {}", self.env, e),
            Err(_) => warn!("Closing {} session timed out", self.env),
        }
    }

    fn park(&self, session: E::Session) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(session);
    }
}

/// A session checked out of a [`SessionPool`].
pub struct PooledSession<'a, E: Engine> {
    pool: &'a SessionPool<E>,
    session: Option<E::Session>,
    _permit: SemaphorePermit<'a>,
}

impl<E: Engine> PooledSession<'_, E> {
    /// Runs one page on the checked-out session.
    ///
    /// # Errors
    ///
    /// Propagates the session's harness-level failure.
    pub async fn run(&mut self, page: &SynthesizedPage, wait: WaitConfig) -> Result<PageRun> {
        match self.session.as_mut() {
            Some(session) => session.run(page, wait).await,
            None => Err(EngineError::AlreadyClosed),
        }
    }

    /// Gives the session back. With reuse enabled it is reset and parked;
    /// otherwise, or if the reset fails, it is closed.
    ///
    /// Returns true if the session was parked for reuse.
    pub async fn release(mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };

        if !self.pool.reuse {
            self.pool.close_session(&mut session).await;
            return false;
        }

        match timeout(DEFAULT_CLEANUP_TIMEOUT, session.reset()).await {
            Ok(Ok(())) => {
                self.pool.park(session);
                true
            }
            Ok(Err(e)) => {
                warn!("Discarding {} session after failed reset: {}", self.pool.env, e);
                self.pool.close_session(&mut session).await;
                false
            }
            Err(_) => {
                warn!("Discarding {} session: reset timed out", self.pool.env);
                self.pool.close_session(&mut session).await;
                false
            }
        }
    }

    /// Closes the session without returning it to the pool.
    pub async fn discard(mut self) {
        if let Some(mut session) = self.session.take() {
            self.pool.close_session(&mut session).await;
        }
    }
}

impl<E: Engine> Drop for PooledSession<'_, E> {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            debug!(
                "{} session dropped while checked out; not returning it to the pool",
                self.pool.env
            );
        }
    }
}
