use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use std::time::Duration;

use crate::ingest::types::PageFetcher;

/// Plain reqwest GET with a per-request timeout. No headers, no retries.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(8),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> String {
        let t0 = std::time::Instant::now();
        let res = self.client.get(url).timeout(self.timeout).send().await;

        // Status is deliberately not inspected; error pages go to the extractor too.
        let body = match res {
            Ok(rsp) => {
                tracing::debug!(url, status = %rsp.status(), "fetched page");
                match rsp.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!(error = ?e, url, "reading response body failed");
                        counter!("jobs_fetch_errors_total").increment(1);
                        String::new()
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, url, "http get failed");
                counter!("jobs_fetch_errors_total").increment(1);
                String::new()
            }
        };

        histogram!("jobs_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        body
    }
}
