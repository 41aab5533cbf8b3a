//! Git queries used to scope a documentation build.
//!
//! Everything shells out to the `git` binary; the build environment is
//! assumed to have it on PATH, as the original CI jobs did.

use std::path::Path;
use std::process::Command;

use crate::error::{DoctriageError, Result};

fn run_git(repo_dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|e| DoctriageError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DoctriageError::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// List the files that differ between `base...head` (the merge-base diff,
/// matching what a pull-request build sees), one path per line, in git's
/// own order.
pub fn diff_name_only(repo_dir: &Path, base_ref: &str, head_ref: &str) -> Result<Vec<String>> {
    let range = format!("{base_ref}...{head_ref}");
    let stdout = run_git(repo_dir, &["diff", "--name-only", &range])?;

    Ok(stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Capture the HEAD commit SHA of the repository being built.
pub fn capture_head_sha(repo_dir: &Path) -> Result<String> {
    let stdout = run_git(repo_dir, &["rev-parse", "HEAD"])?;
    let sha = stdout.trim().to_string();
    if sha.is_empty() {
        return Err(DoctriageError::Git(
            "git rev-parse HEAD returned empty output".to_string(),
        ));
    }
    Ok(sha)
}

/// Check whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
