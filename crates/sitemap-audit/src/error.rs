//! Errors that end a run before any page is audited.

use thiserror::Error;

/// Failure to load or interpret the sitemap. Always fatal.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Transport failure or non-success status.
    #[error("failed to fetch sitemap {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body is not well-formed XML.
    #[error("malformed sitemap XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The document root is not `<urlset>` (e.g. a sitemap index).
    #[error("sitemap has no <urlset> root element")]
    MissingUrlset,

    /// `<urlset>` is present but lists no `<url>` entries.
    #[error("sitemap <urlset> contains no <url> entries")]
    NoEntries,

    /// A `<url>` entry has no `<loc>` child.
    #[error("sitemap entry #{index} has no <loc>")]
    MissingLoc { index: usize },
}
