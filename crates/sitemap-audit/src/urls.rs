//! URL string helpers for sitemap entries.
//!
//! These are plain string operations: no protocol or host validation and
//! no percent-encoding handling.

/// Remove one trailing slash, if present.
pub fn normalize(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Resolve a sitemap entry against the site's base URL.
///
/// Entries that already begin with `http` are returned unchanged. Anything
/// else is treated as a path, given a single leading slash, and appended to
/// the normalized base.
pub fn resolve(base: &str, candidate: &str) -> String {
    if candidate.starts_with("http") {
        return candidate.to_string();
    }

    let base = normalize(base);
    if candidate.starts_with('/') {
        format!("{base}{candidate}")
    } else {
        format!("{base}/{candidate}")
    }
}
