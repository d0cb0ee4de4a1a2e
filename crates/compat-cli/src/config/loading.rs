use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::Serialize;
use tracing::debug;

use crate::cli::{RunArgs, SelectionArgs};
use crate::config::HarnessConfig;
use crate::error::{ConfigError, Result};

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "compat.toml";

/// `COMPAT_CONCURRENCY=8`, `COMPAT_BROWSER__HEADLESS=false`, ...
pub const ENV_PREFIX: &str = "COMPAT_";

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suites: Option<Vec<std::path::PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_sessions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserOverrides>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BrowserOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
}

impl Overrides {
    pub fn from_selection(selection: &SelectionArgs) -> Self {
        Self {
            suites: (!selection.suite.is_empty()).then(|| selection.suite.clone()),
            filter: selection.filter.clone(),
            ..Self::default()
        }
    }

    pub fn from_run_args(args: &RunArgs) -> Self {
        Self {
            target: args.target.map(|t| t.to_string()),
            concurrency: args.concurrency.map(|n| n as usize),
            timeout_ms: args.timeout_ms,
            reuse_sessions: args.fresh_sessions.then_some(false),
            browser: args.headed.then_some(BrowserOverrides {
                headless: Some(false),
            }),
            ..Self::from_selection(&args.selection)
        }
    }
}

impl HarnessConfig {
    /// Loads configuration, resolving relative paths against `cwd`.
    ///
    /// An explicit `config_path` must exist; otherwise `compat.toml` in `cwd`
    /// is used when present.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing explicit config file and `Extract`
    /// when the merged layers do not form a valid configuration.
    pub fn load(overrides: &Overrides, config_path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = config_file {
            debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides));

        let mut config: Self = figment.extract().map_err(ConfigError::from)?;
        config.suites = config.suites.iter().map(|suite| cwd.join(suite)).collect();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TargetSelection;
    use compat_matrix::TargetEnv;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    #[serial]
    fn defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = HarnessConfig::load(&Overrides::default(), None, dir.path()).unwrap();

        assert_eq!(config.target, "CHROME");
        assert_eq!(config.suites, vec![dir.path().join("suites")]);
        assert!(config.reuse_sessions);
        assert!(config.browser.headless);
    }

    #[test]
    #[serial]
    fn file_then_cli() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            target = "IE"
            suites = ["matrix"]
            concurrency = 2

            [browser]
            headless = true
            args = ["--lang=de-DE"]
            window_size = [800, 600]
            "#,
        );

        let from_file = HarnessConfig::load(&Overrides::default(), None, dir.path()).unwrap();
        assert_eq!(from_file.target, "IE");
        assert_eq!(from_file.concurrency, 2);
        assert_eq!(from_file.browser.args, vec!["--lang=de-DE".to_string()]);

        let args = RunArgs {
            target: Some(TargetSelection::One(TargetEnv::Firefox)),
            concurrency: Some(6),
            fresh_sessions: true,
            headed: true,
            ..RunArgs::default()
        };
        let merged =
            HarnessConfig::load(&Overrides::from_run_args(&args), None, dir.path()).unwrap();
        assert_eq!(merged.target, "FF");
        assert_eq!(merged.concurrency, 6);
        assert!(!merged.reuse_sessions);
        assert!(!merged.browser.headless);
        // Untouched nested keys survive.
        assert_eq!(merged.browser.window_size, [800, 600]);
        assert_eq!(merged.suites, vec![dir.path().join("matrix")]);
    }

    #[test]
    #[serial]
    fn environment_between_file_and_cli() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "concurrency = 2\ntimeout_ms = 100\n");

        unsafe {
            std::env::set_var("COMPAT_CONCURRENCY", "3");
            std::env::set_var("COMPAT_BROWSER__HEADLESS", "false");
        }
        let overrides = Overrides {
            timeout_ms: Some(250),
            ..Overrides::default()
        };
        let result = HarnessConfig::load(&overrides, None, dir.path());
        unsafe {
            std::env::remove_var("COMPAT_CONCURRENCY");
            std::env::remove_var("COMPAT_BROWSER__HEADLESS");
        }

        let config = result.unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.timeout_ms, 250);
        assert!(!config.browser.headless);
    }

    #[test]
    #[serial]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = HarnessConfig::load(&Overrides::default(), Some(Path::new("ci.toml")), dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("ci.toml"));
    }

    #[test]
    #[serial]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "concurency = 2\n");
        assert!(HarnessConfig::load(&Overrides::default(), None, dir.path()).is_err());
    }

    #[test]
    fn selection_only_overrides_given_values() {
        let overrides = Overrides::from_selection(&SelectionArgs {
            suite: Vec::new(),
            filter: Some("^style:".to_string()),
        });
        assert!(overrides.suites.is_none());
        assert_eq!(overrides.filter.as_deref(), Some("^style:"));

        let overrides = Overrides::from_selection(&SelectionArgs {
            suite: vec![PathBuf::from("a.toml")],
            filter: None,
        });
        assert_eq!(overrides.suites, Some(vec![PathBuf::from("a.toml")]));
    }
}
