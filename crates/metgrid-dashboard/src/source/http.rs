//! `GET {base}/metric` over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use metgrid_core::error::{MetGridError, Result};
use metgrid_core::protocol::listing::decode_listing;
use metgrid_core::MetricName;

use super::MetricSource;

pub struct HttpMetricSource {
    client: reqwest::Client,
    listing_url: String,
}

impl HttpMetricSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetGridError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            listing_url: format!("{}/metric", base_url.trim_end_matches('/')),
        })
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }
}

#[async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch_metric_names(&self) -> Result<Vec<MetricName>> {
        let resp = self
            .client
            .get(&self.listing_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| MetGridError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetGridError::UpstreamStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| MetGridError::Transport(format!("reading body: {e}")))?;
        decode_listing(&body)
    }
}
