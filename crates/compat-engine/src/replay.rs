//! An engine that replays recorded output instead of running a browser.
//!
//! Useful for re-checking an edited expectation table against the output of a
//! previous run, and for exercising the harness without Chrome. Only cases
//! that produced output are recorded; replaying a probe with no recording for
//! the session's environment fails the way a page that never loads would.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use compat_matrix::TargetEnv;

use crate::engine::{Engine, EngineSession, PageRun};
use crate::error::{EngineError, Result};
use crate::report::{read_reports, RunReport};
use crate::synth::SynthesizedPage;
use crate::wait::WaitConfig;

type Recording = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    recordings: HashMap<TargetEnv, Arc<Recording>>,
}

impl ReplayEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the output `probe_id` emits under `env`.
    #[must_use]
    pub fn record<I, S>(mut self, env: TargetEnv, probe_id: impl Into<String>, emitted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::make_mut(self.recordings.entry(env).or_default())
            .insert(probe_id.into(), emitted.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn from_reports(reports: &[RunReport]) -> Self {
        let mut engine = Self::new();
        for report in reports {
            for case in &report.cases {
                if let Some(actual) = &case.actual {
                    engine = engine.record(report.target, case.id.clone(), actual.iter().cloned());
                }
            }
        }
        engine
    }

    /// Loads recordings from a JSON report file.
    ///
    /// # Errors
    ///
    /// Returns `Report` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_reports(&read_reports(path)?))
    }
}

#[async_trait]
impl Engine for ReplayEngine {
    type Session = ReplaySession;

    fn name(&self) -> &str {
        "replay"
    }

    async fn open_session(&self, env: TargetEnv) -> Result<ReplaySession> {
        Ok(ReplaySession {
            env,
            recording: self.recordings.get(&env).cloned().unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
pub struct ReplaySession {
    env: TargetEnv,
    recording: Arc<Recording>,
}

#[async_trait]
impl EngineSession for ReplaySession {
    async fn run(&mut self, page: &SynthesizedPage, _wait: WaitConfig) -> Result<PageRun> {
        self.recording
            .get(&page.probe_id)
            .map(|emitted| PageRun::new(emitted.clone()))
            .ok_or_else(|| EngineError::LoadFailed {
                probe: page.probe_id.clone(),
                reason: format!("no recorded output for {}", self.env),
            })
    }

    async fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str) -> SynthesizedPage {
        SynthesizedPage {
            probe_id: id.to_string(),
            html: String::new(),
        }
    }

    #[tokio::test]
    async fn replays_per_environment() {
        let engine = ReplayEngine::new()
            .record(TargetEnv::Chrome, "global:Foo", ["X"])
            .record(TargetEnv::InternetExplorer, "global:Foo", ["Y"]);

        let mut chrome = engine.open_session(TargetEnv::Chrome).await.unwrap();
        let mut ie = engine.open_session(TargetEnv::InternetExplorer).await.unwrap();

        let wait = WaitConfig::default();
        assert_eq!(chrome.run(&page("global:Foo"), wait).await.unwrap().emitted, ["X"]);
        assert_eq!(ie.run(&page("global:Foo"), wait).await.unwrap().emitted, ["Y"]);
    }

    #[tokio::test]
    async fn missing_recording_is_a_load_failure() {
        let engine = ReplayEngine::new().record(TargetEnv::Chrome, "global:Foo", ["X"]);
        let mut session = engine.open_session(TargetEnv::Edge).await.unwrap();

        let err = session
            .run(&page("global:Foo"), WaitConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::LoadFailed { probe, .. } if probe == "global:Foo"));
    }

    #[tokio::test]
    async fn preserves_empty_output_and_empty_strings() {
        let engine = ReplayEngine::new()
            .record(TargetEnv::Chrome, "element:a", [""])
            .record(TargetEnv::Chrome, "global:quiet", Vec::<String>::new());
        let mut session = engine.open_session(TargetEnv::Chrome).await.unwrap();
        let wait = WaitConfig::default();

        assert_eq!(session.run(&page("element:a"), wait).await.unwrap().emitted, [""]);
        assert!(session.run(&page("global:quiet"), wait).await.unwrap().emitted.is_empty());
    }
}
