//! Check command: load and validate suites without running anything.

use std::path::Path;

use compat_matrix::TargetEnv;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::config::Overrides;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Errors
///
/// Returns the first authoring error in the configured suites, or a
/// configuration error.
pub async fn execute(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(&Overrides::from_selection(&args.selection), config_path)?;

    ui::info("Checking suites...");
    let catalog = utils::load_catalog(&config)?;

    ui::success(&format!("{} probes loaded", catalog.len()));
    for (kind, count) in catalog.count_by_kind() {
        ui::info(&format!("  {kind}: {count}"));
    }
    for env in TargetEnv::concrete() {
        let overridden = catalog.override_count(env);
        if overridden > 0 {
            ui::info(&format!("  {env} overrides: {overridden}"));
        }
    }

    ui::success("Suites are valid!");
    Ok(())
}
