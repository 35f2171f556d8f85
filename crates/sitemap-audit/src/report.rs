//! Report file naming and the output directory.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Characters that are not allowed in file names on common filesystems.
const UNSAFE_CHARS: &[char] = &['/', ':', '?', '*', '"', '<', '>', '|'];

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://").expect("scheme regex is valid"))
}

/// Turn a page URL into a flat file stem.
///
/// The first `http://` or `https://` is dropped, then every unsafe character
/// becomes `_`.
pub fn sanitize_filename(url: &str) -> String {
    scheme_regex()
        .replace(url, "")
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Path of the PDF report for `url` inside `reports_dir`.
pub fn pdf_path(reports_dir: &Path, url: &str) -> PathBuf {
    reports_dir.join(format!("{}.pdf", sanitize_filename(url)))
}

/// Create the reports directory (and parents) if it does not exist yet.
pub async fn ensure_reports_dir(reports_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(reports_dir)
        .await
        .with_context(|| format!("failed to create reports directory {}", reports_dir.display()))
}
