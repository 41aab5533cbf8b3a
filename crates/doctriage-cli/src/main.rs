//! doctriage - documentation build orchestration and result triage
//!
//! Wraps the documentation `make` build the way the CI job does:
//!
//! - `run`: full sequence (diff, build with log capture, optional
//!   change-notice page, log triage). Exits non-zero when a notebook
//!   execution failed, regardless of the build tool's own exit code.
//! - `affected`: print the HTML pages a diff touches, one per line.
//! - `notice`: render the change-notice page without building.
//! - `triage`: inspect an existing build log.
//!
//! Every input can come from the environment (`PULL_REQUEST`, `COMMIT_SHA`,
//! `DIFF_BASE_REF`, `DOC_MIRROR_URL`), so the binary runs flag-less inside
//! CI the way the original job did.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use doctriage_core::{
    render_failure_report, BuildPipeline, LogTriage, PageRewriter, RunConfig,
};

#[derive(Parser)]
#[command(name = "doctriage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Documentation build orchestration and result triage", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BookOpts {
    /// Repository root containing the book sources
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Book directory, relative to the repository root (also the make target)
    #[arg(long, default_value = "jupyter-book")]
    book_dir: String,
}

#[derive(Args)]
struct DiffOpts {
    /// Script-source directory component matched in diff paths
    #[arg(long, default_value = "python_scripts")]
    scripts_dir: String,

    /// Diff base reference
    #[arg(long, env = "DIFF_BASE_REF", default_value = "origin/main")]
    base_ref: String,

    /// Diff head commit (defaults to HEAD)
    #[arg(long, env = "COMMIT_SHA")]
    head_ref: Option<String>,
}

#[derive(Args)]
struct NoticeOpts {
    /// Pull-request identifier or URL; enables the change-notice page
    #[arg(long, env = "PULL_REQUEST")]
    pull_request: Option<String>,

    /// Deployed main-branch documentation URL used for notice links
    #[arg(
        long,
        env = "DOC_MIRROR_URL",
        default_value = "https://inria.github.io/scikit-learn-mooc"
    )]
    mirror_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full build-and-triage sequence
    Run {
        #[command(flatten)]
        book: BookOpts,

        #[command(flatten)]
        diff: DiffOpts,

        #[command(flatten)]
        notice: NoticeOpts,

        /// Build orchestration binary
        #[arg(long, default_value = "make")]
        make_binary: String,
    },

    /// Print the HTML pages affected by the diff, one per line
    Affected {
        #[command(flatten)]
        book: BookOpts,

        #[command(flatten)]
        diff: DiffOpts,
    },

    /// Render the change-notice page for the current diff without building
    Notice {
        #[command(flatten)]
        book: BookOpts,

        #[command(flatten)]
        diff: DiffOpts,

        #[command(flatten)]
        notice: NoticeOpts,
    },

    /// Inspect an existing build log for failed notebook executions
    Triage {
        #[command(flatten)]
        book: BookOpts,

        /// Log file to inspect (defaults to <book-dir>/build.log)
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    doctriage_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            book,
            diff,
            notice,
            make_binary,
        } => cmd_run(to_config(book, diff, notice, make_binary)).await,
        Commands::Affected { book, diff } => cmd_affected(&book, &diff),
        Commands::Notice { book, diff, notice } => cmd_notice(&book, &diff, &notice),
        Commands::Triage { book, log } => cmd_triage(&book, log),
    }
}

fn to_config(book: BookOpts, diff: DiffOpts, notice: NoticeOpts, make_binary: String) -> RunConfig {
    RunConfig {
        repo_dir: book.repo,
        book_dir: book.book_dir,
        scripts_dir: diff.scripts_dir,
        base_ref: diff.base_ref,
        head_ref: diff.head_ref,
        pull_request: notice.pull_request,
        mirror_url: notice.mirror_url,
        make_binary,
    }
}

/// Run the full build-and-triage sequence
async fn cmd_run(config: RunConfig) -> Result<()> {
    let outcome = BuildPipeline::run(&config)
        .await
        .context("build-and-triage run failed")?;

    println!();
    println!("Affected pages: {}", outcome.affected.len());
    for page in &outcome.affected {
        println!("  {page}");
    }
    println!("Build exit code: {} (informational only)", outcome.build.exit_code);
    println!("Log: {}", outcome.build.log_path.display());
    if outcome.notice_written {
        println!("Change notice: {}", config.html_dir().join(doctriage_core::NOTICE_FILE).display());
    }
    println!("Duration: {}ms", outcome.duration_ms);
    println!();

    if !outcome.verdict.passed {
        print!("{}", render_failure_report(&outcome.verdict));
        anyhow::bail!("notebook execution failed (see reports above)");
    }

    println!("{}", outcome.verdict.message);
    Ok(())
}

/// Print the affected pages for the configured diff range
fn cmd_affected(book: &BookOpts, diff: &DiffOpts) -> Result<()> {
    let changed = doctriage_core::diff_name_only(
        &book.repo,
        &diff.base_ref,
        diff.head_ref.as_deref().unwrap_or("HEAD"),
    )?;
    let rewriter = PageRewriter::new(&diff.scripts_dir, &book.book_dir)?;

    for page in rewriter.affected_pages(&changed) {
        println!("{page}");
    }
    Ok(())
}

/// Render the change-notice page without running a build
fn cmd_notice(book: &BookOpts, diff: &DiffOpts, notice: &NoticeOpts) -> Result<()> {
    let config = RunConfig {
        repo_dir: book.repo.clone(),
        book_dir: book.book_dir.clone(),
        scripts_dir: diff.scripts_dir.clone(),
        base_ref: diff.base_ref.clone(),
        head_ref: diff.head_ref.clone(),
        pull_request: notice.pull_request.clone(),
        mirror_url: notice.mirror_url.clone(),
        ..RunConfig::default()
    };

    let Some(pr) = config.pr_context() else {
        println!("No pull-request context; skipping change notice.");
        return Ok(());
    };

    let changed = doctriage_core::diff_name_only(&config.repo_dir, &config.base_ref, config.head())?;
    let rewriter = PageRewriter::new(&config.scripts_dir, &config.book_dir)?;
    let affected = rewriter.affected_pages(&changed);

    let path =
        doctriage_core::write_change_notice(&config.html_dir(), pr, &affected, &config.mirror_url)?;
    println!("Wrote {} ({} pages)", path.display(), affected.len());
    Ok(())
}

/// Inspect an existing build log
fn cmd_triage(book: &BookOpts, log: Option<PathBuf>) -> Result<()> {
    let config = RunConfig {
        repo_dir: book.repo.clone(),
        book_dir: book.book_dir.clone(),
        ..RunConfig::default()
    };
    let log_path = log.unwrap_or_else(|| config.log_path());

    let verdict = LogTriage::evaluate(&log_path, &config.reports_dir())
        .with_context(|| format!("failed to triage {}", log_path.display()))?;

    if !verdict.passed {
        print!("{}", render_failure_report(&verdict));
        anyhow::bail!("notebook execution failed (see reports above)");
    }

    println!("{}", verdict.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn to_config_maps_all_fields() {
        let config = to_config(
            BookOpts {
                repo: PathBuf::from("/work"),
                book_dir: "book".to_string(),
            },
            DiffOpts {
                scripts_dir: "scripts".to_string(),
                base_ref: "origin/master".to_string(),
                head_ref: Some("deadbeef".to_string()),
            },
            NoticeOpts {
                pull_request: Some("pull/9".to_string()),
                mirror_url: "https://docs.example.org".to_string(),
            },
            "gmake".to_string(),
        );

        assert_eq!(config.repo_dir, PathBuf::from("/work"));
        assert_eq!(config.book_dir, "book");
        assert_eq!(config.scripts_dir, "scripts");
        assert_eq!(config.base_ref, "origin/master");
        assert_eq!(config.head_ref.as_deref(), Some("deadbeef"));
        assert_eq!(config.pr_context(), Some("pull/9"));
        assert_eq!(config.mirror_url, "https://docs.example.org");
        assert_eq!(config.make_binary, "gmake");
    }

    #[test]
    fn triage_of_clean_log_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("build.log");
        std::fs::write(&log, "rendering html\ndone\n").unwrap();

        let book = BookOpts {
            repo: dir.path().to_path_buf(),
            book_dir: "jupyter-book".to_string(),
        };
        assert!(cmd_triage(&book, Some(log)).is_ok());
    }

    #[test]
    fn triage_of_failed_log_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("build.log");
        std::fs::write(&log, "Execution Failed in cell 1\n").unwrap();

        let book = BookOpts {
            repo: dir.path().to_path_buf(),
            book_dir: "jupyter-book".to_string(),
        };
        let err = cmd_triage(&book, Some(log)).unwrap_err();
        assert!(err.to_string().contains("notebook execution failed"));
    }
}
