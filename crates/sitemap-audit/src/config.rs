//! Runtime settings resolved from flags, environment and defaults.

use crate::audit::lighthouse::{self, LighthouseCli};
use crate::cli::Cli;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default remote-debugging port.
pub const DEFAULT_PORT: u16 = 9222;

/// Default reports directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

pub const ENV_CHROME_PATH: &str = "SITEMAP_AUDIT_CHROME_PATH";
pub const ENV_PORT: &str = "SITEMAP_AUDIT_PORT";
pub const ENV_LIGHTHOUSE_PATH: &str = "SITEMAP_AUDIT_LIGHTHOUSE_PATH";
pub const ENV_OUTPUT_DIR: &str = "SITEMAP_AUDIT_OUTPUT_DIR";
pub const ENV_NO_SANDBOX: &str = "SITEMAP_AUDIT_NO_SANDBOX";

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Browser executable; `None` lets the browser driver look for one.
    pub chrome_path: Option<PathBuf>,
    pub port: u16,
    pub lighthouse: LighthouseCli,
    /// Absolute reports directory.
    pub reports_dir: PathBuf,
    pub no_sandbox: bool,
}

impl AuditConfig {
    /// Flags win over environment variables, which win over defaults.
    ///
    /// `env` is a lookup function so tests need not touch the process
    /// environment.
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let chrome_path = cli
            .chrome_path
            .clone()
            .or_else(|| env(ENV_CHROME_PATH).map(PathBuf::from))
            .or_else(find_chrome);

        let port = match (cli.port, env(ENV_PORT)) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {raw}"))?,
            (None, None) => DEFAULT_PORT,
        };

        let lighthouse_command = cli
            .lighthouse_path
            .clone()
            .or_else(|| env(ENV_LIGHTHOUSE_PATH))
            .unwrap_or_else(|| lighthouse::DEFAULT_COMMAND.to_string());
        let lighthouse = LighthouseCli::from_command_line(&lighthouse_command)?;

        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| env(ENV_OUTPUT_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let reports_dir = absolute(&output_dir)?;

        let no_sandbox = cli.no_sandbox || env(ENV_NO_SANDBOX).is_some();

        Ok(Self {
            chrome_path,
            port,
            lighthouse,
            reports_dir,
            no_sandbox,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("cannot resolve output directory {}", path.display()))
}

/// Look for an installed Chrome or Chromium.
pub fn find_chrome() -> Option<PathBuf> {
    // 1. Executables on PATH
    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 2. Well-known install locations
    let common: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            "C:/Program Files/Google/Chrome/Application/chrome.exe",
            "C:/Program Files (x86)/Google/Chrome/Application/chrome.exe",
        ]
    } else {
        &["/usr/bin/google-chrome", "/usr/bin/chromium", "/snap/bin/chromium"]
    };

    common.iter().map(PathBuf::from).find(|p| p.exists())
}
