use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use sitemap_audit::audit::chrome::ChromeLauncher;
use sitemap_audit::cli::Cli;
use sitemap_audit::probe::Prober;
use sitemap_audit::{run, AuditConfig, AuditRunner, SitemapLoader};
use std::sync::Arc;
use tracing::{debug, error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let Some(site_url) = cli.site_url.clone() else {
        eprintln!("Please provide a site URL as an argument");
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("Example: sitemap-audit https://example.com");
        std::process::exit(1);
    };

    let config = AuditConfig::resolve(&cli, |key| std::env::var(key).ok())?;
    debug!("resolved configuration: {config:?}");

    let client = reqwest::Client::builder()
        .user_agent(concat!("sitemap-audit/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let loader = SitemapLoader::new(client.clone());
    let runner = AuditRunner::new(
        Prober::new(client),
        Arc::new(ChromeLauncher::new(
            config.chrome_path.clone(),
            config.port,
            config.no_sandbox,
        )),
        Arc::new(config.lighthouse.clone()),
        config.reports_dir.clone(),
    );

    if let Err(e) = run::run(&site_url, &loader, &runner).await {
        error!("error fetching sitemap: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("sitemap_audit=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
