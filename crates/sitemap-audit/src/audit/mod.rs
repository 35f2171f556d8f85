//! Per-page audit: probe, launch a browser, run Lighthouse, print the report.
//!
//! The browser and the audit engine sit behind traits so the runner's
//! sequencing and cleanup can be exercised without Chromium or Node.

pub mod chrome;
pub mod lighthouse;

#[cfg(test)]
pub(crate) mod testing;

use crate::probe::Prober;
use crate::report;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Something that audits a page through an already-running browser.
#[async_trait]
pub trait AuditEngine: Send + Sync {
    /// Audit `url` via the browser listening on `port`; returns an HTML report.
    async fn audit(&self, url: &str, port: u16) -> Result<String>;
}

/// Starts a fresh browser process.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A running browser process.
#[async_trait]
pub trait BrowserSession: Send {
    /// Remote-debugging port the audit engine connects to.
    fn debugging_port(&self) -> u16;

    /// Load `html` into a new tab and print it to `output` as A4 PDF.
    async fn render_pdf(&mut self, html: &str, output: &Path) -> Result<()>;

    /// Shut the browser down.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// URL does not start with `http`; nothing was attempted.
    InvalidUrl,
    /// Probe did not get a 200; no browser was launched.
    Unreachable,
    /// Report written to this path.
    Generated(PathBuf),
    /// Launch, audit or rendering failed; the error has been logged.
    Failed,
}

/// Runs the audit pipeline for one URL at a time.
pub struct AuditRunner {
    prober: Prober,
    launcher: Arc<dyn BrowserLauncher>,
    engine: Arc<dyn AuditEngine>,
    reports_dir: PathBuf,
}

impl AuditRunner {
    pub fn new(
        prober: Prober,
        launcher: Arc<dyn BrowserLauncher>,
        engine: Arc<dyn AuditEngine>,
        reports_dir: PathBuf,
    ) -> Self {
        Self {
            prober,
            launcher,
            engine,
            reports_dir,
        }
    }

    /// Audit one page. Never fails: every problem is logged and reported
    /// through the returned [`AuditOutcome`].
    ///
    /// One browser is launched per call and always closed before returning.
    pub async fn run(&self, url: &str) -> AuditOutcome {
        if !url.starts_with("http") {
            error!("invalid URL: {url}");
            return AuditOutcome::InvalidUrl;
        }

        if !self.prober.is_reachable(url).await {
            return AuditOutcome::Unreachable;
        }

        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!("error generating report for {url}: {e:#}");
                return AuditOutcome::Failed;
            }
        };

        let result = self.audit_to_pdf(session.as_mut(), url).await;

        if let Err(e) = session.close().await {
            warn!("failed to close browser after auditing {url}: {e:#}");
        }

        match result {
            Ok(path) => {
                info!("PDF report generated: {}", path.display());
                AuditOutcome::Generated(path)
            }
            Err(e) => {
                error!("error generating report for {url}: {e:#}");
                AuditOutcome::Failed
            }
        }
    }

    async fn audit_to_pdf(&self, session: &mut dyn BrowserSession, url: &str) -> Result<PathBuf> {
        let html = self
            .engine
            .audit(url, session.debugging_port())
            .await
            .context("lighthouse audit failed")?;

        report::ensure_reports_dir(&self.reports_dir).await?;
        let path = report::pdf_path(&self.reports_dir, url);

        session
            .render_pdf(&html, &path)
            .await
            .with_context(|| format!("failed to render {}", path.display()))?;

        Ok(path)
    }
}
