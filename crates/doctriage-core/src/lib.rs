//! Doctriage core library
//!
//! Wraps an external documentation build (a `make` target producing a
//! Jupyter-Book HTML tree) and post-processes its output:
//!
//! - computes which HTML pages a git diff affects,
//! - runs the build with its combined output teed to a log file,
//! - renders a change-notice page for pull-request builds,
//! - triages the captured log for failed notebook executions, since the
//!   build tool's exit code cannot be trusted for that.

pub mod changeset;
pub mod config;
pub mod error;
pub mod git;
pub mod notice;
pub mod pipeline;
pub mod runner;
pub mod telemetry;
pub mod triage;

pub use changeset::PageRewriter;
pub use config::RunConfig;
pub use error::{DoctriageError, Result};
pub use git::{capture_head_sha, diff_name_only, is_git_repo};
pub use notice::{render_change_notice, write_change_notice, NOTICE_FILE};
pub use pipeline::{BuildPipeline, RunOutcome};
pub use runner::{BuildOutcome, BuildRunner};
pub use telemetry::init_tracing;
pub use triage::{render_failure_report, LogTriage, ReportDump, TriageVerdict, FAILURE_MARKER};

/// Doctriage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
