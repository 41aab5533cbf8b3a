//! Log triage: the sole failure-classification logic in the workflow.
//!
//! The wrapped build tool exits 0 even when notebook executions fail inside
//! it, so the only trustworthy signal is its log text. Presence of one
//! literal marker substring is the whole state machine: two states, one
//! trigger, no retries.

use std::path::Path;

use glob::glob;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DoctriageError, Result};

/// Literal marker the build tool prints when a notebook execution fails.
pub const FAILURE_MARKER: &str = "Execution Failed";

/// A per-notebook execution report captured for a failed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDump {
    /// Path of the report file.
    pub path: String,

    /// Full file contents, or a placeholder when the file was unreadable.
    pub contents: String,
}

/// Verdict of one log inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageVerdict {
    /// Whether the log is free of the failure marker.
    pub passed: bool,

    /// Captured per-notebook reports (empty when passed).
    pub reports: Vec<ReportDump>,

    /// Summary message.
    pub message: String,
}

/// Inspects a captured build log.
pub struct LogTriage;

impl LogTriage {
    /// Search the log for [`FAILURE_MARKER`].
    ///
    /// Marker absent: verdict passes with no reports. Marker present: every
    /// `*.log` under the reports directory is captured into the verdict, in
    /// glob (alphabetical) order. A missing reports directory yields a
    /// failed verdict with an empty dump, never an error.
    pub fn evaluate(log_path: &Path, reports_dir: &Path) -> Result<TriageVerdict> {
        let log_text = std::fs::read_to_string(log_path)?;

        if !log_text.contains(FAILURE_MARKER) {
            info!(event = "triage.passed", log = %log_path.display());
            return Ok(TriageVerdict {
                passed: true,
                reports: Vec::new(),
                message: "Build succeeded: no failed notebook executions".to_string(),
            });
        }

        let reports = collect_reports(reports_dir)?;
        warn!(
            event = "triage.failed",
            log = %log_path.display(),
            reports = reports.len(),
        );

        Ok(TriageVerdict {
            passed: false,
            reports,
            message: format!("found '{FAILURE_MARKER}' in {}", log_path.display()),
        })
    }
}

fn collect_reports(reports_dir: &Path) -> Result<Vec<ReportDump>> {
    let pattern = format!("{}/*.log", reports_dir.display());
    let entries = glob(&pattern).map_err(|e| DoctriageError::ReportGlob(e.to_string()))?;

    let mut reports = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path)
                    .unwrap_or_else(|e| format!("<unreadable report: {e}>"));
                reports.push(ReportDump {
                    path: path.display().to_string(),
                    contents,
                });
            }
            Err(e) => reports.push(ReportDump {
                path: e.path().display().to_string(),
                contents: format!("<unreadable report: {e}>"),
            }),
        }
    }
    Ok(reports)
}

/// Render the console report for a failed verdict: a banner, then each
/// captured report framed by separators.
pub fn render_failure_report(verdict: &TriageVerdict) -> String {
    let mut out = String::new();
    out.push_str("=========================\n");
    out.push_str("Notebook execution failed\n");
    out.push_str("=========================\n");

    for report in &verdict.reports {
        out.push_str("-------------------------\n");
        out.push_str(&report.path);
        out.push('\n');
        out.push_str("-------------------------\n");
        out.push_str(&report.contents);
        if !report.contents.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
