//! Posts report windows to the metrics server.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use metgrid_core::error::{MetGridError, Result};
use metgrid_core::protocol::report::MetricReport;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Reporter {
    client: reqwest::Client,
    endpoint: String,
}

impl Reporter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MetGridError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one window as JSON. Any non-2xx status is an error.
    pub async fn post(&self, report: &MetricReport) -> Result<()> {
        let body = report.to_json()?;
        tracing::debug!(metrics = report.len(), bytes = body.len(), "posting report");

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| MetGridError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetGridError::UpstreamStatus(status.as_u16()));
        }
        Ok(())
    }
}
