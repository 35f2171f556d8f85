//! Headless Chromium over CDP, used both as the audit target and as the
//! PDF printer for finished reports.

use super::{BrowserLauncher, BrowserSession};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::debug;

/// A4 paper in inches, as CDP expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Launches one headless browser per call on a fixed debugging port.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    executable: Option<PathBuf>,
    port: u16,
    no_sandbox: bool,
}

impl ChromeLauncher {
    /// `executable: None` defers to chromiumoxide's own detection.
    pub fn new(executable: Option<PathBuf>, port: u16, no_sandbox: bool) -> Self {
        Self {
            executable,
            port,
            no_sandbox,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder().port(self.port);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        builder
            .build()
            .map_err(|e| anyhow!("invalid browser configuration: {e}"))
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch browser")?;

        // The CDP connection only makes progress while the handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error: {e}");
                }
            }
        });

        debug!("browser listening on debugging port {}", self.port);
        Ok(Box::new(ChromeSession {
            browser,
            handler,
            port: self.port,
        }))
    }
}

/// A launched browser plus the task driving its CDP connection.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    port: u16,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    fn debugging_port(&self) -> u16 {
        self.port
    }

    async fn render_pdf(&mut self, html: &str, output: &Path) -> Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to open a new tab")?;

        // set_content waits for the tab to finish loading.
        page.set_content(html)
            .await
            .context("failed to load report into tab")?;
        page.save_pdf(a4_pdf_params(), output)
            .await
            .with_context(|| format!("failed to print {}", output.display()))?;

        if let Err(e) = page.close().await {
            debug!("failed to close report tab: {e}");
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        let closed = this.browser.close().await;
        let exited = if closed.is_ok() {
            this.browser.wait().await.map(|_| ())
        } else {
            Ok(())
        };
        this.handler.abort();

        closed.context("failed to close browser")?;
        exited.context("browser did not exit")?;
        Ok(())
    }
}

/// Print options for the report: A4, backgrounds included.
fn a4_pdf_params() -> PrintToPdfParams {
    PrintToPdfParams {
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        print_background: Some(true),
        ..Default::default()
    }
}
