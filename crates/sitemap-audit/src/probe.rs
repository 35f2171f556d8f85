//! Single-shot reachability check before committing to a full audit.

use tracing::{debug, info};

/// Result of probing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    /// The page answered with exactly 200.
    Reachable,
    /// The page answered with some other status.
    Status(u16),
    /// No response at all (DNS, connect, TLS, body read).
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }

    fn status_label(&self) -> String {
        match self {
            Reachability::Reachable => "200".to_string(),
            Reachability::Status(code) => code.to_string(),
            Reachability::Unreachable => "unknown".to_string(),
        }
    }
}

/// Issues one GET per page and classifies the response.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Probe `url` once. Non-200 answers are logged as a skip.
    pub async fn probe(&self, url: &str) -> Reachability {
        let result = match self.client.get(url).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => Reachability::Reachable,
            Ok(resp) => Reachability::Status(resp.status().as_u16()),
            Err(e) => {
                debug!("request to {url} failed: {e}");
                Reachability::Unreachable
            }
        };

        if !result.is_reachable() {
            info!(
                "skipping {url} due to status code: {}",
                result.status_label()
            );
        }
        result
    }

    /// `true` only when the page answers with exactly 200.
    pub async fn is_reachable(&self, url: &str) -> bool {
        self.probe(url).await.is_reachable()
    }
}
