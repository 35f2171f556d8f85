//! Drive the Lighthouse CLI against a browser that is already running.

use super::AuditEngine;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Default command used to invoke Lighthouse.
pub const DEFAULT_COMMAND: &str = "lighthouse";

/// Lighthouse invoked as an external process.
///
/// The report is read from stdout; Lighthouse's own progress logging goes
/// straight to our stderr.
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    program: String,
    prefix_args: Vec<String>,
}

impl LighthouseCli {
    pub fn new(program: impl Into<String>, prefix_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args,
        }
    }

    /// Parse a whitespace-separated command line such as `npx lighthouse`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts
            .next()
            .context("lighthouse command must not be empty")?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn audit_args(&self, url: &str, port: u16) -> Vec<String> {
        let mut args = self.prefix_args.clone();
        args.extend([
            url.to_string(),
            format!("--port={port}"),
            "--output=html".to_string(),
            "--output-path=stdout".to_string(),
        ]);
        args
    }
}

impl Default for LighthouseCli {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND, Vec::new())
    }
}

#[async_trait]
impl AuditEngine for LighthouseCli {
    async fn audit(&self, url: &str, port: u16) -> Result<String> {
        let args = self.audit_args(url, port);
        debug!("running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to start {}", self.program))?;

        if !output.status.success() {
            bail!("{} exited with {}", self.program, output.status);
        }

        let report = String::from_utf8(output.stdout).context("report is not valid UTF-8")?;
        if report.trim().is_empty() {
            bail!("{} produced an empty report", self.program);
        }
        Ok(report)
    }
}
