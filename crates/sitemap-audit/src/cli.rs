//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Audit every page in a site's sitemap with Lighthouse and save each
/// report as a PDF.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "sitemap-audit", version)]
pub struct Cli {
    /// Site root, e.g. https://example.com (or the sitemap.xml URL itself)
    pub site_url: Option<String>,

    /// Browser executable [env: SITEMAP_AUDIT_CHROME_PATH]
    #[arg(long, value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Remote-debugging port shared by the browser and Lighthouse
    /// [env: SITEMAP_AUDIT_PORT] [default: 9222]
    #[arg(long)]
    pub port: Option<u16>,

    /// Lighthouse executable, optionally with leading arguments such as
    /// "npx lighthouse" [env: SITEMAP_AUDIT_LIGHTHOUSE_PATH] [default: lighthouse]
    #[arg(long, value_name = "COMMAND")]
    pub lighthouse_path: Option<String>,

    /// Where PDF reports are written [env: SITEMAP_AUDIT_OUTPUT_DIR]
    /// [default: reports]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Launch the browser without its sandbox (containers)
    /// [env: SITEMAP_AUDIT_NO_SANDBOX]
    #[arg(long)]
    pub no_sandbox: bool,
}
