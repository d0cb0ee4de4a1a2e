//! A Chrome tab acting as one isolated engine session.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::page::Page as ChromePage;
use compat_matrix::TargetEnv;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::console::{parse_console_event, ConsoleCapture};
use crate::engine::{EngineSession, PageRun};
use crate::error::{EngineError, Result};
use crate::synth::{SynthesizedPage, COLLECT_EXPRESSION, DONE_EXPRESSION};
use crate::wait::{wait_for_result, WaitConfig};

/// A browser tab with console capture, emulating one target environment.
#[derive(Debug)]
pub struct ChromiumSession {
    page: Option<ChromePage>,
    env: TargetEnv,
    console: ConsoleCapture,
    console_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Wraps a freshly created tab: applies the user-agent override and starts
    /// the console listener.
    pub(crate) async fn open(page: ChromePage, env: TargetEnv, user_agent: &str) -> Result<Self> {
        page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        let console = ConsoleCapture::new();
        let sink = console.clone();
        let mut events = page.event_listener::<EventConsoleApiCalled>().await?;
        let console_task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                sink.push(parse_console_event(&event));
            }
        });

        debug!("Opened {} session", env);

        Ok(Self {
            page: Some(page),
            env,
            console,
            console_task,
        })
    }

    fn page(&self) -> Result<&ChromePage> {
        self.page.as_ref().ok_or(EngineError::AlreadyClosed)
    }

    async fn wait_for_done(&self, probe: &str, config: WaitConfig) -> Result<()> {
        let page = self.page()?;
        wait_for_result(
            || async move {
                let result = page
                    .evaluate(DONE_EXPRESSION)
                    .await
                    .map_err(|e| EngineError::ScriptExecutionFailed(e.to_string()))?;

                Ok(result
                    .value()
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false))
            },
            config,
            &format!("probe '{probe}' completion"),
        )
        .await
    }
}

#[async_trait]
impl EngineSession for ChromiumSession {
    async fn run(&mut self, synthesized: &SynthesizedPage, wait: WaitConfig) -> Result<PageRun> {
        self.console.clear();
        let page = self.page()?;
        let url = synthesized.data_url();

        page.goto(url.as_str())
            .await
            .map_err(|e| EngineError::LoadFailed {
                probe: synthesized.probe_id.clone(),
                reason: e.to_string(),
            })?;

        self.wait_for_done(&synthesized.probe_id, wait).await?;

        let emitted: Vec<String> = self
            .page()?
            .evaluate(COLLECT_EXPRESSION)
            .await
            .map_err(|e| EngineError::ScriptExecutionFailed(e.to_string()))?
            .into_value()
            .map_err(|e| EngineError::ScriptExecutionFailed(e.to_string()))?;

        let errors = self.console.error_count();
        let console = self.console.drain();
        if errors > 0 {
            debug!(
                "{} console errors while running {}: {:?}",
                errors, synthesized.probe_id, console
            );
        }

        Ok(PageRun { emitted, console })
    }

    async fn reset(&mut self) -> Result<()> {
        self.page()?
            .goto("about:blank")
            .await
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;
        self.console.clear();
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.console_task.abort();
        if let Some(page) = self.page.take() {
            page.close().await?;
        }
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.console_task.abort();
        let Some(page) = self.page.take() else {
            return;
        };

        warn!("{} session dropped without close(); closing its tab", self.env);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        debug!("Closing dropped tab failed: {}", e);
                    }
                });
            }
            // The tab stays open until the browser closes.
            Err(_) => debug!("No runtime to close dropped tab"),
        }
    }
}
