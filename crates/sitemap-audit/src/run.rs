//! Sitemap-wide audit loop.

use crate::audit::{AuditOutcome, AuditRunner};
use crate::error::SitemapError;
use crate::sitemap::SitemapLoader;
use crate::urls;
use tracing::info;

/// Load the sitemap once, then audit each page strictly in declaration
/// order, one at a time.
///
/// Only a sitemap failure is returned as an error; per-page problems are
/// logged by the runner and show up in the returned outcomes.
pub async fn run(
    site_url: &str,
    loader: &SitemapLoader,
    runner: &AuditRunner,
) -> Result<Vec<AuditOutcome>, SitemapError> {
    let sitemap = loader.load(site_url).await?;
    info!("found {} URLs in sitemap", sitemap.urls.len());
    info!("using base URL: {}", sitemap.base_url);

    let mut outcomes = Vec::with_capacity(sitemap.urls.len());
    for entry in &sitemap.urls {
        let full_url = urls::resolve(&sitemap.base_url, entry);
        info!("running lighthouse for: {full_url}");
        outcomes.push(runner.run(&full_url).await);
    }

    info!("lighthouse audits completed");
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::testing::{FakeEngine, FakeLauncher};
    use crate::probe::Prober;
    use crate::report;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn runner(
        launcher: &Arc<FakeLauncher>,
        engine: &Arc<FakeEngine>,
        reports: std::path::PathBuf,
    ) -> AuditRunner {
        AuditRunner::new(
            Prober::new(reqwest::Client::new()),
            launcher.clone(),
            engine.clone(),
            reports,
        )
    }

    #[tokio::test]
    async fn test_pages_audited_in_sitemap_order() {
        let server = MockServer::start().await;
        let base = server.uri();
        let sitemap = format!(
            "<urlset>\
               <url><loc>/zeta</loc></url>\
               <url><loc>{base}/alpha</loc></url>\
               <url><loc>gone</loc></url>\
               <url><loc>mid</loc></url>\
             </urlset>"
        );
        mount(&server, "/sitemap.xml", 200, &sitemap).await;
        mount(&server, "/zeta", 200, "ok").await;
        mount(&server, "/alpha", 200, "ok").await;
        mount(&server, "/gone", 404, "").await;
        mount(&server, "/mid", 200, "ok").await;

        let tmp = tempfile::TempDir::new().unwrap();
        let reports = tmp.path().join("reports");
        let launcher = Arc::new(FakeLauncher::new());
        let engine = Arc::new(FakeEngine::new());
        let runner = runner(&launcher, &engine, reports.clone());
        let loader = SitemapLoader::new(reqwest::Client::new());

        let outcomes = run(&format!("{base}/"), &loader, &runner).await.unwrap();

        let audited: Vec<String> = engine.audited().into_iter().map(|(u, _)| u).collect();
        assert_eq!(
            audited,
            vec![
                format!("{base}/zeta"),
                format!("{base}/alpha"),
                format!("{base}/mid"),
            ]
        );

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[2], AuditOutcome::Unreachable);
        assert_eq!(
            outcomes[3],
            AuditOutcome::Generated(report::pdf_path(&reports, &format!("{base}/mid")))
        );

        // One browser per audited page, each closed.
        assert_eq!(launcher.launches(), 3);
        assert_eq!(launcher.closes(), 3);
        assert_eq!(std::fs::read_dir(&reports).unwrap().count(), 3);
        assert!(!report::pdf_path(&reports, &format!("{base}/gone")).exists());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount(
            &server,
            "/sitemap.xml",
            200,
            "<urlset><url><loc>/bad</loc></url><url><loc>/good</loc></url></urlset>",
        )
        .await;
        mount(&server, "/bad", 200, "ok").await;
        mount(&server, "/good", 200, "ok").await;

        let tmp = tempfile::TempDir::new().unwrap();
        let launcher = Arc::new(FakeLauncher::new());
        let engine = Arc::new(FakeEngine::failing_on("/bad"));
        let runner = runner(&launcher, &engine, tmp.path().join("reports"));
        let loader = SitemapLoader::new(reqwest::Client::new());

        let outcomes = run(&base, &loader, &runner).await.unwrap();
        assert_eq!(outcomes[0], AuditOutcome::Failed);
        assert!(matches!(outcomes[1], AuditOutcome::Generated(_)));
        assert_eq!(launcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_sitemap_failure_audits_nothing() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let tmp = tempfile::TempDir::new().unwrap();
        let reports = tmp.path().join("reports");
        let launcher = Arc::new(FakeLauncher::new());
        let engine = Arc::new(FakeEngine::new());
        let runner = runner(&launcher, &engine, reports.clone());
        let loader = SitemapLoader::new(reqwest::Client::new());

        let result = run(&format!("http://127.0.0.1:{port}"), &loader, &runner).await;
        assert!(matches!(result, Err(SitemapError::Request { .. })));
        assert_eq!(launcher.launches(), 0);
        assert!(!reports.exists());
    }
}
