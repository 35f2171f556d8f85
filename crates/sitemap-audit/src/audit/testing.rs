//! In-process stand-ins for the browser and the audit engine.

use super::{AuditEngine, BrowserLauncher, BrowserSession};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every audit and returns a small HTML document naming the URL.
pub(crate) struct FakeEngine {
    audited: Mutex<Vec<(String, u16)>>,
    fail_suffix: Option<String>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            audited: Mutex::new(Vec::new()),
            fail_suffix: None,
        }
    }

    /// Fails for any URL ending with `suffix`.
    pub(crate) fn failing_on(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::new()
        }
    }

    pub(crate) fn report_for(url: &str) -> String {
        format!("<html><body>report for {url}</body></html>")
    }

    pub(crate) fn audited(&self) -> Vec<(String, u16)> {
        self.audited.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditEngine for FakeEngine {
    async fn audit(&self, url: &str, port: u16) -> Result<String> {
        self.audited.lock().unwrap().push((url.to_string(), port));
        if let Some(suffix) = &self.fail_suffix {
            if url.ends_with(suffix.as_str()) {
                bail!("audit engine crashed on {url}");
            }
        }
        Ok(Self::report_for(url))
    }
}

/// Hands out sessions that write the HTML verbatim instead of printing it.
pub(crate) struct FakeLauncher {
    launches: AtomicUsize,
    closes: Arc<AtomicUsize>,
    fail_launch: bool,
    fail_render: bool,
}

impl FakeLauncher {
    pub(crate) const PORT: u16 = 9333;

    pub(crate) fn new() -> Self {
        Self {
            launches: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_launch: false,
            fail_render: false,
        }
    }

    pub(crate) fn failing_launch() -> Self {
        Self {
            fail_launch: true,
            ..Self::new()
        }
    }

    pub(crate) fn failing_render() -> Self {
        Self {
            fail_render: true,
            ..Self::new()
        }
    }

    pub(crate) fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if self.fail_launch {
            bail!("no browser executable");
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            closes: Arc::clone(&self.closes),
            fail_render: self.fail_render,
        }))
    }
}

struct FakeSession {
    closes: Arc<AtomicUsize>,
    fail_render: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    fn debugging_port(&self) -> u16 {
        FakeLauncher::PORT
    }

    async fn render_pdf(&mut self, html: &str, output: &Path) -> Result<()> {
        if self.fail_render {
            bail!("tab crashed");
        }
        tokio::fs::write(output, html).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
