//! Change-notice page for pull-request builds.
//!
//! A small static HTML page listing the pages a pull request touches, with
//! side-by-side links to the freshly built artifact and to the deployed
//! main-branch copy. Reviewers open it straight from the CI artifact tree.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// File name of the generated notice page inside the HTML output tree.
pub const NOTICE_FILE: &str = "_changed.html";

/// Render the notice page.
///
/// Pure function of its inputs: the same pull request, page list, and
/// mirror URL always produce identical bytes.
pub fn render_change_notice(pull_request: &str, pages: &[String], mirror_url: &str) -> String {
    let mirror = mirror_url.trim_end_matches('/');

    let mut html = String::new();
    html.push_str("<html>\n<body>\n");
    html.push_str(&format!("<p>Files changed by {pull_request}:</p>\n"));
    html.push_str("<ul>\n");
    for page in pages {
        html.push_str(&format!(
            "<li><a href=\"{page}\">{page}</a> [<a href=\"{mirror}/{page}\">main</a>]</li>\n"
        ));
    }
    html.push_str("</ul>\n");
    html.push_str("<p><a href=\"index.html\">index</a></p>\n");
    html.push_str("</body>\n</html>\n");
    html
}

/// Write the notice page into the HTML output tree, overwriting any prior
/// version. Returns the path written.
///
/// Callers gate this on the pull-request context: without one, the page is
/// neither written nor touched.
pub fn write_change_notice(
    html_dir: &Path,
    pull_request: &str,
    pages: &[String],
    mirror_url: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(html_dir)?;
    let path = html_dir.join(NOTICE_FILE);
    std::fs::write(&path, render_change_notice(pull_request, pages, mirror_url))?;

    info!(
        event = "notice.written",
        path = %path.display(),
        pages = pages.len(),
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIRROR: &str = "https://docs.example.org";

    #[test]
    fn renders_pair_of_links_per_page() {
        let pages = vec!["x.html".to_string(), "y/z.html".to_string()];
        let html = render_change_notice("pull/42", &pages, MIRROR);

        assert!(html.contains("Files changed by pull/42"));
        assert!(html.contains("<a href=\"x.html\">x.html</a>"));
        assert!(html.contains("<a href=\"https://docs.example.org/x.html\">main</a>"));
        assert!(html.contains("<a href=\"y/z.html\">y/z.html</a>"));
        assert!(html.contains("<a href=\"https://docs.example.org/y/z.html\">main</a>"));
        assert!(html.contains("<a href=\"index.html\">index</a>"));
    }

    #[test]
    fn empty_list_renders_empty_ul() {
        let html = render_change_notice("pull/7", &[], MIRROR);
        assert!(html.contains("<ul>\n</ul>"));
        assert!(html.contains("index.html"));
    }

    #[test]
    fn mirror_trailing_slash_is_normalized() {
        let pages = vec!["x.html".to_string()];
        let with_slash = render_change_notice("pr", &pages, "https://docs.example.org/");
        let without = render_change_notice("pr", &pages, "https://docs.example.org");
        assert_eq!(with_slash, without);
        assert!(!with_slash.contains("org//x.html"));
    }

    #[test]
    fn write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec!["a.html".to_string(), "b.html".to_string()];

        let path1 = write_change_notice(dir.path(), "pull/1", &pages, MIRROR).unwrap();
        let first = std::fs::read(&path1).unwrap();

        let path2 = write_change_notice(dir.path(), "pull/1", &pages, MIRROR).unwrap();
        let second = std::fs::read(&path2).unwrap();

        assert_eq!(path1, path2);
        assert_eq!(first, second, "repeated writes must be byte-identical");
    }

    #[test]
    fn write_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(NOTICE_FILE);
        std::fs::write(&path, "old page").unwrap();

        write_change_notice(dir.path(), "pull/2", &["n.html".to_string()], MIRROR).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(!html.contains("old page"));
        assert!(html.contains("n.html"));
    }

    #[test]
    fn write_creates_missing_output_tree() {
        let dir = tempfile::tempdir().unwrap();
        let html_dir = dir.path().join("_build").join("html");

        let path = write_change_notice(&html_dir, "pull/3", &[], MIRROR).unwrap();
        assert!(path.exists());
    }
}
