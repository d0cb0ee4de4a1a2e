//! Run command: execute the matrix against Chrome or a recorded report.

use std::path::Path;
use std::sync::Arc;

use compat_engine::{
    ChromiumEngine, Engine, MatrixRunner, ReplayEngine, RunOptions, RunReport, RunSummary,
    write_reports,
};
use compat_matrix::{Catalog, TargetEnv};
use tracing::{debug, warn};

use crate::cli::RunArgs;
use crate::commands::utils;
use crate::config::Overrides;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the run command.
///
/// Targets run one after another, each with its own session pool. The JSON
/// report (if requested) is written even when cases fail.
///
/// # Errors
///
/// Returns configuration, authoring and engine launch errors before any
/// case runs, and `RunFailed` afterwards if any case did not pass.
pub async fn execute(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(&Overrides::from_run_args(&args), config_path)?;
    let catalog = utils::load_catalog(&config)?;
    let targets = config.targets()?;
    let options = config.run_options();

    ui::info(&format!(
        "Running {} probes against {}",
        catalog.len(),
        targets.iter().map(|env| env.as_str()).collect::<Vec<_>>().join(", ")
    ));

    let reports = match &args.replay {
        Some(recording) => {
            let engine = ReplayEngine::from_file(recording)?;
            debug!("Replaying {}", recording.display());
            run_targets(Arc::new(engine), &catalog, &targets, options).await
        }
        None => {
            let engine = Arc::new(ChromiumEngine::launch(config.chromium_config()).await?);
            let reports = run_targets(engine.clone(), &catalog, &targets, options).await;
            if let Err(e) = engine.close().await {
                warn!("Failed to close browser: {}", e);
            }
            reports
        }
    };

    if let Some(path) = &args.report {
        write_reports(path, &reports)?;
        ui::info(&format!("Report written to {}", path.display()));
    }

    ui::print_run_summary(&reports);
    verdict(&reports)
}

async fn run_targets<E: Engine>(
    engine: Arc<E>,
    catalog: &Catalog,
    targets: &[TargetEnv],
    options: RunOptions,
) -> Vec<RunReport> {
    let runner = MatrixRunner::new(engine, options);
    let mut reports = Vec::with_capacity(targets.len());

    for &env in targets {
        let progress = ui::RunProgress::new(env.as_str(), catalog.len() as u64);
        let report = runner
            .run_with_progress(catalog, env, |case| progress.record(case))
            .await;
        progress.finish();
        reports.push(report);
    }

    reports
}

/// Zero failures across every target, or `RunFailed`.
fn verdict(reports: &[RunReport]) -> Result<()> {
    let total = RunSummary::combine(reports.iter().map(|r| &r.summary));
    if total.failed() == 0 {
        ui::success(&format!("All {} cases passed", total.total));
        Ok(())
    } else {
        Err(CliError::RunFailed {
            failed: total.failed(),
            total: total.total,
        })
    }
}
