//! Per-case and per-run reports.
//!
//! Reports serialize to JSON so a run can be archived and later replayed
//! through [`crate::replay::ReplayEngine`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use compat_matrix::{compare, Comparison, Difference, ProbeCase, ProbeKind, TargetEnv};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::executor::ExecutionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pass,
    /// Output differed from the resolved expectation.
    Mismatch,
    /// The engine produced no output at all (load failure, timeout).
    HarnessError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    pub probe: String,
    pub kind: ProbeKind,
    pub target: TargetEnv,
    pub status: CaseStatus,
    pub expected: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_difference: Option<Difference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub console_errors: Vec<String>,
    pub duration_ms: u64,
}

impl CaseReport {
    /// Compares an execution against the case's expectation for `env`.
    #[must_use]
    pub fn from_execution(case: &ProbeCase, env: TargetEnv, result: ExecutionResult) -> Self {
        let console_errors = result
            .console
            .iter()
            .filter(|m| m.level.is_error())
            .map(|m| m.text.clone())
            .collect();

        let (status, first_difference) = match compare(case, env, &result.emitted) {
            Comparison::Pass => (CaseStatus::Pass, None),
            Comparison::Mismatch { first_difference, .. } => {
                (CaseStatus::Mismatch, Some(first_difference))
            }
        };

        Self {
            id: case.id(),
            probe: case.name().to_string(),
            kind: case.kind(),
            target: env,
            status,
            expected: case.expected(env).to_vec(),
            actual: Some(result.emitted),
            first_difference,
            error: None,
            console_errors,
            duration_ms: millis(result.duration),
        }
    }

    #[must_use]
    pub fn harness_error(
        case: &ProbeCase,
        env: TargetEnv,
        error: &EngineError,
        elapsed: Duration,
    ) -> Self {
        Self {
            id: case.id(),
            probe: case.name().to_string(),
            kind: case.kind(),
            target: env,
            status: CaseStatus::HarnessError,
            expected: case.expected(env).to_vec(),
            actual: None,
            first_difference: None,
            error: Some(error.to_string()),
            console_errors: Vec::new(),
            duration_ms: millis(elapsed),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status == CaseStatus::Pass
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub harness_errors: usize,
}

impl RunSummary {
    fn record(&mut self, case: &CaseReport) {
        self.total += 1;
        match case.status {
            CaseStatus::Pass => self.passed += 1,
            CaseStatus::Mismatch => self.mismatched += 1,
            CaseStatus::HarnessError => self.harness_errors += 1,
        }
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.mismatched + self.harness_errors
    }

    /// Aggregates summaries of several runs.
    #[must_use]
    pub fn combine<'a>(summaries: impl IntoIterator<Item = &'a RunSummary>) -> Self {
        summaries.into_iter().fold(Self::default(), |acc, s| Self {
            total: acc.total + s.total,
            passed: acc.passed + s.passed,
            mismatched: acc.mismatched + s.mismatched,
            harness_errors: acc.harness_errors + s.harness_errors,
        })
    }
}

/// All case reports of one run against one target environment, in catalog
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub engine: String,
    pub target: TargetEnv,
    pub summary: RunSummary,
    pub duration_ms: u64,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(
        engine: impl Into<String>,
        target: TargetEnv,
        cases: Vec<CaseReport>,
        elapsed: Duration,
    ) -> Self {
        let mut summary = RunSummary::default();
        for case in &cases {
            summary.record(case);
        }
        Self {
            engine: engine.into(),
            target,
            summary,
            duration_ms: millis(elapsed),
            cases,
        }
    }

    /// True only if every case passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.summary.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| !case.is_pass())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportFile {
    Many(Vec<RunReport>),
    One(Box<RunReport>),
}

/// Writes run reports as pretty-printed JSON.
///
/// # Errors
///
/// Returns `Report` if serialization fails, `Io` if the file cannot be
/// written.
pub fn write_reports(path: &Path, reports: &[RunReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports).map_err(|e| EngineError::Report {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a report file holding one run report or an array of them.
///
/// # Errors
///
/// Returns `Report` if the file is missing or not a report.
pub fn read_reports(path: &Path) -> Result<Vec<RunReport>> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::Report {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let parsed: ReportFile = serde_json::from_str(&content).map_err(|e| EngineError::Report {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(match parsed {
        ReportFile::Many(reports) => reports,
        ReportFile::One(report) => vec![*report],
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleLevel, ConsoleMessage};
    use compat_matrix::Expectations;

    fn execution(emitted: &[&str]) -> ExecutionResult {
        ExecutionResult {
            probe_id: "style:div".to_string(),
            emitted: emitted.iter().map(|s| (*s).to_string()).collect(),
            console: vec![
                ConsoleMessage::new(ConsoleLevel::Log, "noise"),
                ConsoleMessage::new(ConsoleLevel::Error, "Uncaught TypeError"),
            ],
            duration: Duration::from_millis(12),
        }
    }

    fn style_case() -> ProbeCase {
        ProbeCase::style("div", Expectations::new(["", "block"])).unwrap()
    }

    #[test]
    fn mismatch_records_first_difference_and_console_errors() {
        let report = CaseReport::from_execution(
            &style_case(),
            TargetEnv::Chrome,
            execution(&["", "inline"]),
        );

        assert_eq!(report.status, CaseStatus::Mismatch);
        assert_eq!(report.first_difference.as_ref().map(|d| d.index), Some(1));
        assert_eq!(report.console_errors, ["Uncaught TypeError"]);
        assert_eq!(report.duration_ms, 12);
    }

    #[test]
    fn summary_counts_each_status() {
        let case = style_case();
        let cases = vec![
            CaseReport::from_execution(&case, TargetEnv::Chrome, execution(&["", "block"])),
            CaseReport::from_execution(&case, TargetEnv::Chrome, execution(&["block"])),
            CaseReport::harness_error(
                &case,
                TargetEnv::Chrome,
                &EngineError::CaseTimeout {
                    probe: case.id(),
                    timeout: Duration::from_secs(1),
                },
                Duration::from_secs(1),
            ),
        ];

        let report = RunReport::new("test", TargetEnv::Chrome, cases, Duration::from_secs(2));
        assert_eq!(
            report.summary,
            RunSummary {
                total: 3,
                passed: 1,
                mismatched: 1,
                harness_errors: 1
            }
        );
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn harness_errors_serialize_without_actual_output() {
        let case = style_case();
        let report = CaseReport::harness_error(
            &case,
            TargetEnv::InternetExplorer,
            &EngineError::LoadFailed {
                probe: case.id(),
                reason: "net::ERR_ABORTED".to_string(),
            },
            Duration::ZERO,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "harness_error");
        assert_eq!(json["target"], "IE");
        assert!(json.get("actual").is_none());
        assert!(json["error"].as_str().unwrap().contains("net::ERR_ABORTED"));
    }

    #[test]
    fn reports_round_trip_through_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let case = style_case();
        let report = RunReport::new(
            "chromium",
            TargetEnv::Firefox,
            vec![CaseReport::from_execution(&case, TargetEnv::Firefox, execution(&["", "block"]))],
            Duration::from_millis(40),
        );

        write_reports(&path, std::slice::from_ref(&report)).unwrap();
        assert_eq!(read_reports(&path).unwrap(), vec![report.clone()]);

        fs::write(&path, serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(read_reports(&path).unwrap(), vec![report]);
    }
}
