//! Sitemap-driven Lighthouse auditing.
//!
//! Fetches a site's `sitemap.xml`, probes every listed page, audits the
//! reachable ones with Lighthouse in a headless browser, and prints each
//! report to an A4 PDF. Pages are processed strictly one after another.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod probe;
pub mod report;
pub mod run;
pub mod sitemap;
pub mod urls;

pub use audit::{AuditEngine, AuditOutcome, AuditRunner, BrowserLauncher, BrowserSession};
pub use config::AuditConfig;
pub use error::SitemapError;
pub use sitemap::{Sitemap, SitemapLoader};
