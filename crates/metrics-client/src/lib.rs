//! HTTP client for the external per-ticker metrics service.
//!
//! The service is a black box returning the fixed
//! `{fundamental, technical, risk}` schema. Each request carries its own
//! timeout; errors are mapped to `ProviderError` so the orchestrator can
//! skip the ticker and move on.

use async_trait::async_trait;
use std::time::Duration;
use trend_core::{MetricBundle, MetricProvider, TrendError};

/// Per-ticker request timeout; no cross-ticker budget exists
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct MetricsClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, base_url }
    }

    /// Build from `METRICS_SERVICE_URL`, defaulting to a local service
    pub fn from_env() -> Self {
        let base_url = std::env::var("METRICS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8010".to_string());
        Self::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Check service health
    pub async fn health(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl MetricProvider for MetricsClient {
    async fn metric_bundle(&self, ticker: &str) -> Result<MetricBundle, TrendError> {
        let url = format!("{}/metrics/{}", self.base_url, ticker);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendError::ProviderError(format!("{}: {}", ticker, e)))?;

        if !response.status().is_success() {
            return Err(TrendError::ProviderError(format!(
                "{}: metrics service returned status {}",
                ticker,
                response.status()
            )));
        }

        response
            .json::<MetricBundle>()
            .await
            .map_err(|e| TrendError::ProviderError(format!("{}: malformed bundle: {}", ticker, e)))
    }
}
