//! `GET /metric` listing payload.
//!
//! Only `metrics` is consumed; any other field the server adds is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{MetGridError, Result};
use crate::grid::MetricName;

/// Server payload listing every known metric name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricName>,
}

/// Decode a listing body. A missing or `null` `metrics` field is an error.
pub fn decode_listing(body: &[u8]) -> Result<Vec<MetricName>> {
    let resp: MetricsResponse = serde_json::from_slice(body)
        .map_err(|e| MetGridError::Decode(format!("invalid metric listing: {e}")))?;
    Ok(resp.metrics)
}
