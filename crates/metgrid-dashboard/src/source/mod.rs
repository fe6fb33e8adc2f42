//! Where the controller gets its metric names from.

mod http;

use async_trait::async_trait;

use metgrid_core::error::Result;
use metgrid_core::MetricName;

pub use http::HttpMetricSource;

/// Source of the metric-name listing. Called once per controller.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch_metric_names(&self) -> Result<Vec<MetricName>>;
}
