//! Affected-page computation from raw diff paths.
//!
//! Two independent rewrite rules map source paths to the HTML pages the
//! build regenerates from them:
//!
//! 1. script sources: `[<prefix>/]<scripts-dir>/<rest>.py` -> `<rest>.html`
//! 2. book markup: `<book-dir>/<rest>.md` -> `<rest>.html`
//!
//! Rule 1 results come first, rule 2 results second, diff order within each
//! rule. Duplicates are not removed: a diff that matches both rules for the
//! same page yields the page twice.

use regex::Regex;

use crate::error::{DoctriageError, Result};

/// Rewrites diff paths into the HTML pages a build will regenerate.
#[derive(Debug, Clone)]
pub struct PageRewriter {
    scripts_dir: String,
    scripts_re: Regex,
    book_re: Regex,
}

impl PageRewriter {
    /// Build a rewriter for the given script-source and book directories.
    pub fn new(scripts_dir: &str, book_dir: &str) -> Result<Self> {
        if scripts_dir.is_empty() || book_dir.is_empty() {
            return Err(DoctriageError::InvalidConfig(
                "scripts_dir and book_dir must be non-empty".to_string(),
            ));
        }

        // Non-greedy prefix: rewrite from the first scripts-dir component.
        let scripts_re = Regex::new(&format!(
            r"^(?:.*?/)?{}/(.*)\.py$",
            regex::escape(scripts_dir)
        ))
        .map_err(|e| DoctriageError::InvalidConfig(e.to_string()))?;

        let book_re = Regex::new(&format!(r"^{}/(.*)\.md$", regex::escape(book_dir)))
            .map_err(|e| DoctriageError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            scripts_dir: scripts_dir.to_string(),
            scripts_re,
            book_re,
        })
    }

    /// Map changed paths to the affected HTML pages.
    ///
    /// Paths that merely contain the scripts directory but are not `.py`
    /// files pass through unrewritten, matching the original
    /// filter-then-substitute behavior.
    pub fn affected_pages(&self, changed: &[String]) -> Vec<String> {
        let mut pages = Vec::new();

        for path in changed {
            if !path.contains(&self.scripts_dir) {
                continue;
            }
            match self.scripts_re.captures(path) {
                Some(caps) => pages.push(format!("{}.html", &caps[1])),
                None => pages.push(path.clone()),
            }
        }

        for path in changed {
            if let Some(caps) = self.book_re.captures(path) {
                pages.push(format!("{}.html", &caps[1]));
            }
        }

        pages
    }
}
