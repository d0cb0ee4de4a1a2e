//! Harness configuration with multi-source loading.
//!
//! Priority: CLI > `COMPAT_*` environment > `compat.toml` > defaults.
//!
//! ```toml
//! target = "all"
//! suites = ["suites"]
//! concurrency = 8
//! timeout_ms = 5000
//!
//! [browser]
//! headless = true
//! args = ["--lang=en-US"]
//! ```

mod loading;
mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use loading::{BrowserOverrides, CONFIG_FILE_NAME, ENV_PREFIX, Overrides};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Environment tag, or `all` for every concrete environment.
    pub target: String,

    /// Suite files and directories, relative to the working directory.
    pub suites: Vec<PathBuf>,

    /// Regex over probe ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    pub concurrency: usize,

    /// Completion wait per page.
    pub timeout_ms: u64,

    pub poll_interval_ms: u64,

    /// Reset and reuse sessions between probes.
    pub reuse_sessions: bool,

    #[serde(default)]
    pub browser: BrowserSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserSettings {
    pub headless: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    /// Extra Chrome flags, appended to the built-in ones.
    #[serde(default)]
    pub args: Vec<String>,

    pub window_size: [u32; 2],
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            target: "CHROME".to_string(),
            suites: vec![PathBuf::from("suites")],
            filter: None,
            concurrency: compat_engine::DEFAULT_CONCURRENCY,
            timeout_ms: millis(compat_engine::DEFAULT_TIMEOUT),
            poll_interval_ms: millis(compat_engine::DEFAULT_POLL_INTERVAL),
            reuse_sessions: true,
            browser: BrowserSettings::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            args: Vec::new(),
            window_size: [1280, 800],
        }
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
