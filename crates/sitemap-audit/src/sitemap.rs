//! Fetch a site's `sitemap.xml` and list the pages it declares.
//!
//! Only the `<urlset><url><loc>` shape is understood. Sitemap indexes and
//! any other structural surprise are reported as [`SitemapError`]s, which the
//! caller treats as fatal.

use crate::error::SitemapError;
use crate::urls;
use quick_xml::events::Event;
use tracing::info;

const SITEMAP_FILE: &str = "sitemap.xml";

/// Where the sitemap lives and which base URL relative entries resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapLocation {
    /// Site root without `/sitemap.xml` and without a trailing slash.
    pub base_url: String,
    /// URL the sitemap is requested from.
    pub sitemap_url: String,
}

impl SitemapLocation {
    /// Derive both URLs from the command-line argument, which may or may not
    /// already point at `sitemap.xml`.
    pub fn from_site_url(site_url: &str) -> Self {
        let stripped = site_url.replacen("/sitemap.xml", "", 1);
        let base_url = urls::normalize(&stripped).to_string();
        let sitemap_url = if site_url.ends_with(SITEMAP_FILE) {
            site_url.to_string()
        } else {
            format!("{base_url}/{SITEMAP_FILE}")
        };

        Self {
            base_url,
            sitemap_url,
        }
    }
}

/// A loaded sitemap.
#[derive(Debug, Clone)]
pub struct Sitemap {
    /// `<loc>` values in declaration order, exactly as written.
    pub urls: Vec<String>,
    /// Base URL for resolving relative entries.
    pub base_url: String,
}

/// Fetches and parses sitemaps over HTTP.
#[derive(Debug, Clone)]
pub struct SitemapLoader {
    client: reqwest::Client,
}

impl SitemapLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the sitemap for `site_url` with a single GET and parse it.
    ///
    /// No retries. Non-success statuses are errors.
    pub async fn load(&self, site_url: &str) -> Result<Sitemap, SitemapError> {
        let location = SitemapLocation::from_site_url(site_url);
        info!("fetching sitemap from: {}", location.sitemap_url);

        let request_error = |source| SitemapError::Request {
            url: location.sitemap_url.clone(),
            source,
        };

        let body = self
            .client
            .get(&location.sitemap_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(request_error)?
            .text()
            .await
            .map_err(request_error)?;

        let urls = parse_urlset(&body)?;

        Ok(Sitemap {
            urls,
            base_url: location.base_url,
        })
    }
}

/// Extract the first `<loc>` of every `<url>` under a `<urlset>` root.
pub fn parse_urlset(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut saw_urlset = false;
    let mut entries = 0usize;
    // Some(loc-so-far) while inside a <url>; loc is None until seen.
    let mut current: Option<Option<String>> = None;
    let mut in_loc = false;
    let mut urls = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|source| SitemapError::Xml {
            position: reader.error_position(),
            source,
        })?;

        match event {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match (depth, name.as_str()) {
                    (0, "urlset") => saw_urlset = true,
                    (1, "url") if saw_urlset => current = Some(None),
                    (2, "loc") if matches!(current, Some(None)) => in_loc = true,
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match (depth, name.as_str()) {
                    (0, "urlset") => saw_urlset = true,
                    (1, "url") if saw_urlset => {
                        return Err(SitemapError::MissingLoc { index: entries });
                    }
                    // <loc/> is present but empty.
                    (2, "loc") if matches!(current, Some(None)) => {
                        current = Some(Some(String::new()));
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if in_loc => {
                let text = e.unescape().map_err(|source| SitemapError::Xml {
                    position: reader.error_position(),
                    source: source.into(),
                })?;
                append_loc(&mut current, &text);
            }
            Event::CData(ref e) if in_loc => {
                let text = String::from_utf8_lossy(&e[..]).to_string();
                append_loc(&mut current, &text);
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match (depth, name.as_str()) {
                    (2, "loc") if in_loc => {
                        in_loc = false;
                        // Mark the loc as seen even if it had no text.
                        if let Some(loc) = current.as_mut() {
                            loc.get_or_insert_with(String::new);
                        }
                    }
                    (1, "url") => {
                        if let Some(loc) = current.take() {
                            let loc = loc.ok_or(SitemapError::MissingLoc { index: entries })?;
                            urls.push(loc.trim().to_string());
                            entries += 1;
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_urlset {
        return Err(SitemapError::MissingUrlset);
    }
    if urls.is_empty() {
        return Err(SitemapError::NoEntries);
    }

    Ok(urls)
}

fn append_loc(current: &mut Option<Option<String>>, text: &str) {
    if let Some(loc) = current.as_mut() {
        loc.get_or_insert_with(String::new).push_str(text);
    }
}
