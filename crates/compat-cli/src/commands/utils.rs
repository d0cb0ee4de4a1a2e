use std::path::Path;

use compat_matrix::Catalog;
use tracing::debug;

use crate::config::{HarnessConfig, Overrides};
use crate::error::{CliError, Result};

/// Loads and validates configuration relative to the working directory.
pub(crate) fn load_config(
    overrides: &Overrides,
    config_path: Option<&Path>,
) -> Result<HarnessConfig> {
    let cwd = std::env::current_dir()?;
    let config = HarnessConfig::load(overrides, config_path, &cwd)?;
    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Loads every configured suite and applies the filter. Authoring errors
/// abort here, before anything runs.
pub(crate) fn load_catalog(config: &HarnessConfig) -> Result<Catalog> {
    let catalog = Catalog::load(config.suites.as_slice())?;
    let catalog = match &config.filter {
        Some(pattern) => catalog.filtered(pattern)?,
        None => catalog,
    };
    if catalog.is_empty() {
        return Err(CliError::NoProbes);
    }
    Ok(catalog)
}
