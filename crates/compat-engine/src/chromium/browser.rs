//! Browser process lifecycle.
//!
//! `ChromiumEngine` implements Drop only implicitly through chromiumoxide's
//! `Browser`, which kills the Chrome process, and `TempDir`, which removes the
//! profile directory. Call `close()` at the end of a run for a graceful
//! shutdown.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use compat_matrix::TargetEnv;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::emulation::user_agent;
use super::session::ChromiumSession;
use crate::engine::Engine;
use crate::error::{EngineError, Result};

/// Configuration for launching the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumConfig {
    /// Run in headless mode (default: true).
    pub headless: bool,

    /// Browser window size (default: 1280x800).
    pub window_size: (u32, u32),

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub chrome_path: Option<String>,
}

impl ChromiumConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the browser window, for watching probes run.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args.extend(args);
        self
    }

    #[must_use]
    pub fn with_chrome_path(mut self, path: impl Into<String>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Chrome arguments derived from this config, before the per-launch
    /// profile directory is added.
    #[must_use]
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        if self.headless {
            args.push("--headless".to_string());
        }
        args.push(format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ));
        args.extend(self.args.iter().cloned());
        args
    }

    fn to_browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig> {
        let mut config = BrowserConfig::builder();
        if !self.headless {
            config = config.with_head();
        }

        for arg in self.launch_args() {
            config = config.arg(arg);
        }

        // A unique profile directory per launch keeps parallel harness runs
        // from tripping over Chrome's ProcessSingleton lock.
        config = config.arg(format!("--user-data-dir={}", profile_dir.display()));

        if let Some(path) = &self.chrome_path {
            config = config.chrome_executable(path.clone());
        }

        config.build().map_err(|e| EngineError::LaunchFailed {
            reason: format!("invalid browser configuration: {e}"),
            source: None,
        })
    }
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1280, 800),
            args: vec![
                // --no-sandbox is only acceptable because probe pages are
                // generated locally; required where user namespaces are
                // unavailable (containers).
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
                "--disable-extensions".to_string(),
            ],
            chrome_path: None,
        }
    }
}

/// A running Chrome process acting as the engine under test.
pub struct ChromiumEngine {
    inner: RwLock<Option<Running>>,
    profile_path: PathBuf,
    handler: JoinHandle<()>,
}

// Field order matters: the browser is killed before its profile is removed.
struct Running {
    browser: Browser,
    profile: TempDir,
}

impl ChromiumEngine {
    /// Launches Chrome and establishes the CDP connection.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if Chrome is not installed, not executable,
    /// or fails to start.
    pub async fn launch(config: ChromiumConfig) -> Result<Self> {
        debug!("Launching browser with config: {:?}", config);

        let profile = tempfile::Builder::new()
            .prefix("compat-engine-")
            .tempdir()?;
        let browser_config = config.to_browser_config(profile.path())?;

        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| EngineError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide only processes CDP events while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser launched with profile {}", profile.path().display());

        Ok(Self {
            profile_path: profile.path().to_path_buf(),
            inner: RwLock::new(Some(Running { browser, profile })),
            handler,
        })
    }

    /// Chrome profile directory of this launch; removed by `close()`.
    #[must_use]
    pub fn profile_dir(&self) -> &Path {
        &self.profile_path
    }

    /// Closes the browser and kills the Chrome process.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser fails to close gracefully.
    pub async fn close(&self) -> Result<()> {
        let mut running_guard = self.inner.write().await;

        if let Some(Running { mut browser, profile }) = running_guard.take() {
            debug!("Closing browser gracefully");
            browser
                .close()
                .await
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;
            if let Err(e) = browser.wait().await {
                warn!("Browser process did not exit cleanly: {}", e);
            }
            if let Err(e) = profile.close() {
                warn!(
                    "Failed to remove browser profile {}: {}",
                    self.profile_path.display(),
                    e
                );
            }
        }
        self.handler.abort();

        Ok(())
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.is_none()
    }
}

#[async_trait]
impl Engine for ChromiumEngine {
    type Session = ChromiumSession;

    fn name(&self) -> &str {
        "chromium"
    }

    async fn open_session(&self, env: TargetEnv) -> Result<ChromiumSession> {
        // Shared guard: sessions open concurrently, only close() waits.
        let page = {
            let running = self.inner.read().await;
            let running = running.as_ref().ok_or(EngineError::AlreadyClosed)?;
            running
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?
        };

        ChromiumSession::open(page, env, user_agent(env)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_args_follow_config() {
        let args = ChromiumConfig::default().launch_args();
        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--window-size=1280,800".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));

        let visible = ChromiumConfig::new()
            .visible()
            .with_window_size(800, 600)
            .with_args(vec!["--lang=en-US".to_string()])
            .launch_args();
        assert!(!visible.contains(&"--headless".to_string()));
        assert_eq!(visible[0], "--window-size=800,600");
        assert_eq!(visible.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn engine_launch_and_close() {
        let engine = ChromiumEngine::launch(ChromiumConfig::default())
            .await
            .expect("failed to launch browser");

        assert!(!engine.is_closed().await);
        assert!(engine.profile_dir().exists());
        engine.close().await.expect("failed to close browser");
        assert!(engine.is_closed().await);
        assert!(!engine.profile_dir().exists());
    }
}
