use std::time::Duration;

use compat_engine::{ChromiumConfig, RunOptions, WaitConfig};
use compat_matrix::TargetEnv;

use crate::cli::TargetSelection;
use crate::config::HarnessConfig;
use crate::error::{ConfigError, Result};

impl HarnessConfig {
    /// Checks values figment cannot check by type alone.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        self.targets()?;

        if self.concurrency == 0 {
            return Err(invalid("concurrency", "0", "Use at least 1"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "0", "Use a positive number of milliseconds"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.timeout_ms {
            return Err(invalid(
                "poll_interval_ms",
                &self.poll_interval_ms.to_string(),
                "Use a positive interval no longer than timeout_ms",
            ));
        }
        if self.suites.is_empty() {
            return Err(invalid("suites", "[]", "List at least one suite file or directory"));
        }
        let [width, height] = self.browser.window_size;
        if width == 0 || height == 0 {
            return Err(invalid(
                "browser.window_size",
                &format!("[{width}, {height}]"),
                "Both dimensions must be positive",
            ));
        }
        Ok(())
    }

    /// The environments this configuration runs against.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an unknown tag.
    pub fn targets(&self) -> Result<Vec<TargetEnv>> {
        self.target
            .parse::<TargetSelection>()
            .map(TargetSelection::targets)
            .map_err(|e| invalid("target", &self.target, &e.to_string()))
    }

    pub fn run_options(&self) -> RunOptions {
        let wait = WaitConfig::new(
            Duration::from_millis(self.timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        );
        RunOptions::with_wait(wait)
            .concurrency(self.concurrency)
            .reuse_sessions(self.reuse_sessions)
    }

    pub fn chromium_config(&self) -> ChromiumConfig {
        let [width, height] = self.browser.window_size;
        let mut config = ChromiumConfig::new().with_window_size(width, height);
        if !self.browser.headless {
            config = config.visible();
        }
        if !self.browser.args.is_empty() {
            config = config.with_args(self.browser.args.clone());
        }
        if let Some(path) = &self.browser.chrome_path {
            config = config.with_chrome_path(path.clone());
        }
        config
    }
}

fn invalid(field: &str, value: &str, hint: &str) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}
