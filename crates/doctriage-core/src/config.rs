//! Run configuration for the build-and-triage workflow.
//!
//! All inputs the original CI job read from its environment are reachable
//! here as well: [`RunConfig::from_env`] overlays the recognised variables
//! onto the defaults, and the CLI maps the same variables through clap's
//! `env` fallbacks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pull-request identifier or URL; presence enables the change-notice page.
pub const PULL_REQUEST_ENV: &str = "PULL_REQUEST";

/// Commit SHA used as the diff head (push-build variant).
pub const COMMIT_SHA_ENV: &str = "COMMIT_SHA";

/// Override for the diff base reference.
pub const DIFF_BASE_ENV: &str = "DIFF_BASE_REF";

/// Override for the deployed main-branch documentation URL.
pub const MIRROR_URL_ENV: &str = "DOC_MIRROR_URL";

/// Configuration for one build-and-triage run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Repository root the build runs in.
    pub repo_dir: PathBuf,

    /// Book source directory, relative to the repository root. Doubles as
    /// the make target name.
    pub book_dir: String,

    /// Directory component identifying script sources in diff paths.
    pub scripts_dir: String,

    /// Diff base reference (left side of the three-dot range).
    pub base_ref: String,

    /// Diff head; `None` means the current HEAD.
    pub head_ref: Option<String>,

    /// Pull-request identifier or URL. Empty counts as unset.
    pub pull_request: Option<String>,

    /// Base URL of the deployed main-branch documentation, used for the
    /// reference links on the change-notice page.
    pub mirror_url: String,

    /// Build orchestration binary.
    pub make_binary: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            book_dir: "jupyter-book".to_string(),
            scripts_dir: "python_scripts".to_string(),
            base_ref: "origin/main".to_string(),
            head_ref: None,
            pull_request: None,
            mirror_url: "https://inria.github.io/scikit-learn-mooc".to_string(),
            make_binary: "make".to_string(),
        }
    }
}

impl RunConfig {
    /// Build a configuration from the process environment, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(pr) = non_empty_var(PULL_REQUEST_ENV) {
            config.pull_request = Some(pr);
        }
        if let Some(sha) = non_empty_var(COMMIT_SHA_ENV) {
            config.head_ref = Some(sha);
        }
        if let Some(base) = non_empty_var(DIFF_BASE_ENV) {
            config.base_ref = base;
        }
        if let Some(url) = non_empty_var(MIRROR_URL_ENV) {
            config.mirror_url = url;
        }
        config
    }

    /// Pull-request context, treating empty and whitespace-only values as
    /// unset. The change-notice page is written only when this is `Some`.
    pub fn pr_context(&self) -> Option<&str> {
        self.pull_request
            .as_deref()
            .map(str::trim)
            .filter(|pr| !pr.is_empty())
    }

    /// Diff head reference, defaulting to the current HEAD.
    pub fn head(&self) -> &str {
        self.head_ref.as_deref().unwrap_or("HEAD")
    }

    /// Path of the captured build log.
    pub fn log_path(&self) -> PathBuf {
        self.book_path().join("build.log")
    }

    /// Root of the HTML output tree produced by the build tool.
    pub fn html_dir(&self) -> PathBuf {
        self.book_path().join("_build").join("html")
    }

    /// Directory holding the per-notebook execution reports.
    pub fn reports_dir(&self) -> PathBuf {
        self.html_dir().join("reports")
    }

    fn book_path(&self) -> PathBuf {
        self.repo_dir.join(&self.book_dir)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = RunConfig::default();
        assert_eq!(config.book_dir, "jupyter-book");
        assert_eq!(config.scripts_dir, "python_scripts");
        assert_eq!(config.base_ref, "origin/main");
        assert_eq!(config.make_binary, "make");
        assert_eq!(config.log_path(), PathBuf::from("./jupyter-book/build.log"));
        assert_eq!(
            config.reports_dir(),
            PathBuf::from("./jupyter-book/_build/html/reports")
        );
    }

    #[test]
    fn test_pr_context_empty_counts_as_unset() {
        let mut config = RunConfig::default();
        assert_eq!(config.pr_context(), None);

        config.pull_request = Some(String::new());
        assert_eq!(config.pr_context(), None);

        config.pull_request = Some("   ".to_string());
        assert_eq!(config.pr_context(), None);

        config.pull_request = Some("https://github.com/org/repo/pull/42".to_string());
        assert_eq!(
            config.pr_context(),
            Some("https://github.com/org/repo/pull/42")
        );
    }

    #[test]
    fn test_head_defaults_to_head() {
        let mut config = RunConfig::default();
        assert_eq!(config.head(), "HEAD");

        config.head_ref = Some("abc123".to_string());
        assert_eq!(config.head(), "abc123");
    }

    #[test]
    fn test_from_env_overlays_variables() {
        std::env::set_var(PULL_REQUEST_ENV, "https://github.com/org/repo/pull/3");
        std::env::set_var(COMMIT_SHA_ENV, "cafebabe");
        std::env::set_var(DIFF_BASE_ENV, "origin/master");
        std::env::set_var(MIRROR_URL_ENV, "https://docs.example.org");

        let config = RunConfig::from_env();
        assert_eq!(
            config.pr_context(),
            Some("https://github.com/org/repo/pull/3")
        );
        assert_eq!(config.head(), "cafebabe");
        assert_eq!(config.base_ref, "origin/master");
        assert_eq!(config.mirror_url, "https://docs.example.org");

        std::env::remove_var(PULL_REQUEST_ENV);
        std::env::remove_var(COMMIT_SHA_ENV);
        std::env::remove_var(DIFF_BASE_ENV);
        std::env::remove_var(MIRROR_URL_ENV);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = RunConfig {
            repo_dir: PathBuf::from("/work/docs"),
            book_dir: "book".to_string(),
            scripts_dir: "scripts".to_string(),
            base_ref: "origin/master".to_string(),
            head_ref: Some("deadbeef".to_string()),
            pull_request: Some("42".to_string()),
            mirror_url: "https://docs.example.org".to_string(),
            make_binary: "gmake".to_string(),
        };

        let json = serde_json::to_string(&config).expect("serialize");
        let deserialized: RunConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, deserialized);
    }
}
