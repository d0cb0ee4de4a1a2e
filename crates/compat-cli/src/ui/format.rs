//! Formatting for case diagnostics and run summaries.

use std::time::Duration;

use compat_engine::{CaseReport, CaseStatus, RunReport, RunSummary};
use owo_colors::Style;

use super::paint;

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use compat_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Renders a logged sequence with every value quoted, so an empty string
/// stays visible: `["", "block"]`.
pub fn format_sequence(values: &[String]) -> String {
    format!("{values:?}")
}

/// Multi-line diagnostic for a failed case; empty for a pass.
pub fn format_failure(case: &CaseReport) -> String {
    let header = format!(
        "{} {} {}",
        paint("✗", Style::new().red().bold()),
        paint(&case.id, Style::new().bold()),
        paint(format!("[{}]", case.target), Style::new().dimmed())
    );

    match case.status {
        CaseStatus::Pass => String::new(),
        CaseStatus::HarnessError => format!(
            "{header} {}\n    {}",
            paint("harness error", Style::new().red()),
            case.error.as_deref().unwrap_or("unknown error")
        ),
        CaseStatus::Mismatch => {
            let mut out = format!(
                "{header} {}\n    expected: {}\n    actual:   {}",
                paint("mismatch", Style::new().yellow()),
                format_sequence(&case.expected),
                format_sequence(case.actual.as_deref().unwrap_or_default())
            );
            if let Some(diff) = &case.first_difference {
                out.push_str(&format!(
                    "\n    first difference at index {}: expected {}, got {}",
                    diff.index,
                    describe(diff.expected.as_deref()),
                    describe(diff.actual.as_deref())
                ));
            }
            for message in &case.console_errors {
                out.push_str(&format!("\n    console: {message}"));
            }
            out
        }
    }
}

fn describe(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => "nothing".to_string(),
    }
}

/// `CHROME: 40 passed, 2 mismatched, 1 harness error (1.20s)`
pub fn format_summary_line(label: &str, summary: &RunSummary, duration: Duration) -> String {
    let passed = paint(format!("{} passed", summary.passed), Style::new().green());
    let mismatched = format!("{} mismatched", summary.mismatched);
    let errors = format!(
        "{} harness error{}",
        summary.harness_errors,
        if summary.harness_errors == 1 { "" } else { "s" }
    );
    let style = if summary.failed() == 0 {
        Style::new().dimmed()
    } else {
        Style::new().red()
    };

    format!(
        "{}: {}, {}, {} ({})",
        paint(label, Style::new().bold()),
        passed,
        paint(mismatched, style),
        paint(errors, style),
        format_duration(duration)
    )
}

/// Prints one line per target plus a total when more than one target ran.
pub fn print_run_summary(reports: &[RunReport]) {
    if super::is_quiet() {
        return;
    }

    eprintln!("\n{}", paint("Run Summary", Style::new().bold().underline()));
    for report in reports {
        eprintln!(
            "  {}",
            format_summary_line(
                report.target.as_str(),
                &report.summary,
                Duration::from_millis(report.duration_ms)
            )
        );
    }

    if reports.len() > 1 {
        let total = RunSummary::combine(reports.iter().map(|r| &r.summary));
        let elapsed = reports.iter().map(|r| Duration::from_millis(r.duration_ms)).sum();
        eprintln!("  {}", format_summary_line("Total", &total, elapsed));
    }
}
