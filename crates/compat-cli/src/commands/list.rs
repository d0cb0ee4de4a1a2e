//! List command: print each selected probe with its resolved expectation.
//!
//! Output goes to stdout, one probe per line:
//! `<TARGET>\t<id>\t<expected sequence>`.

use std::path::Path;

use compat_matrix::Catalog;

use crate::cli::ListArgs;
use crate::commands::utils;
use crate::config::Overrides;
use crate::error::Result;
use crate::ui;

/// Execute the list command.
///
/// # Errors
///
/// Returns configuration and authoring errors.
pub async fn execute(args: ListArgs, config_path: Option<&Path>) -> Result<()> {
    let overrides = Overrides {
        target: args.target.map(|t| t.to_string()),
        ..Overrides::from_selection(&args.selection)
    };
    let config = utils::load_config(&overrides, config_path)?;
    let catalog = utils::load_catalog(&config)?;

    for env in config.targets()? {
        for line in render(&catalog, env) {
            println!("{line}");
        }
    }
    Ok(())
}

fn render(catalog: &Catalog, env: compat_matrix::TargetEnv) -> Vec<String> {
    catalog
        .iter()
        .map(|case| {
            let marker = if case.expectations().is_overridden(env) { "*" } else { "" };
            format!(
                "{env}\t{}{marker}\t{}",
                case.id(),
                ui::format_sequence(case.expected(env))
            )
        })
        .collect()
}
