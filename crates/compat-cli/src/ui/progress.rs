//! Progress bar for a matrix run against one target.

use std::time::Duration;

use compat_engine::{CaseReport, CaseStatus};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Counts completed cases; failures are printed above the bar as they
/// arrive. Hidden when quiet, in CI, or when stderr is not a terminal.
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    pub fn new(label: &str, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if Self::should_show() {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("valid template")
                    .progress_chars("█▓▒░"),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    /// Hidden progress, for tests and piped output.
    pub fn hidden(total: u64) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden()),
        }
    }

    pub fn should_show() -> bool {
        !super::is_quiet() && console::user_attended_stderr() && !super::is_ci()
    }

    /// Records one finished case.
    pub fn record(&self, case: &CaseReport) {
        if case.status != CaseStatus::Pass {
            let text = super::format_failure(case);
            if self.bar.is_hidden() {
                eprintln!("{text}");
            } else {
                self.bar.suspend(|| eprintln!("{text}"));
            }
        }
        self.bar.set_message(case.id.clone());
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for RunProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
