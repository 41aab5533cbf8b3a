//! Sequential orchestration of one build-and-triage run.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::changeset::PageRewriter;
use crate::config::RunConfig;
use crate::error::Result;
use crate::git;
use crate::notice;
use crate::runner::{BuildOutcome, BuildRunner};
use crate::triage::{LogTriage, TriageVerdict};

/// Summary of a complete run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// HTML pages affected by the diff, in rewrite order.
    pub affected: Vec<String>,

    /// Build invocation result.
    pub build: BuildOutcome,

    /// Triage verdict for the captured log.
    pub verdict: TriageVerdict,

    /// Whether the change-notice page was written this run.
    pub notice_written: bool,

    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Orchestrates diff -> build -> notice -> triage.
pub struct BuildPipeline;

impl BuildPipeline {
    /// Execute the full sequence.
    ///
    /// Steps run strictly in order with no recovery: any step error aborts
    /// the run. A failed triage verdict is a normal return value; mapping
    /// it to the process exit code is the caller's concern.
    pub async fn run(config: &RunConfig) -> Result<RunOutcome> {
        let start = Instant::now();
        let started_at = Utc::now();

        match git::capture_head_sha(&config.repo_dir) {
            Ok(sha) => info!(event = "run.started", head = %sha),
            Err(_) => info!(event = "run.started"),
        }

        let changed = git::diff_name_only(&config.repo_dir, &config.base_ref, config.head())?;
        let rewriter = PageRewriter::new(&config.scripts_dir, &config.book_dir)?;
        let affected = rewriter.affected_pages(&changed);
        info!(
            event = "changeset.computed",
            base = %config.base_ref,
            head = %config.head(),
            changed = changed.len(),
            affected = affected.len(),
        );

        let build = BuildRunner::run(config).await?;

        let notice_written = match config.pr_context() {
            Some(pr) => {
                notice::write_change_notice(&config.html_dir(), pr, &affected, &config.mirror_url)?;
                true
            }
            None => false,
        };

        let verdict = LogTriage::evaluate(&build.log_path, &config.reports_dir())?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            event = "run.finished",
            passed = verdict.passed,
            notice_written = notice_written,
            duration_ms = duration_ms,
        );

        Ok(RunOutcome {
            started_at,
            affected,
            build,
            verdict,
            notice_written,
            duration_ms,
        })
    }
}
