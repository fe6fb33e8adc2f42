//! Chart image URL construction.
//!
//! Shape: `{base}/metric/{percent-encoded name}/{op}.png?[t={stamp}&]width={w}&height={h}`.
//! `base` is empty for same-origin paths.

use crate::grid::{AggregationOp, MetricName};

/// Requested chart dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self { width: 800, height: 500 }
    }
}

/// Builder for chart image sources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageUrl {
    base: String,
    size: ChartSize,
}

impl ImageUrl {
    pub fn new(base: impl Into<String>, size: ChartSize) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            size,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn size(&self) -> ChartSize {
        self.size
    }

    /// Path without query.
    pub fn path(&self, name: &MetricName, op: AggregationOp) -> String {
        format!(
            "{}/metric/{}/{}.png",
            self.base,
            urlencoding::encode(name.as_str()),
            op
        )
    }

    pub fn src(&self, name: &MetricName, op: AggregationOp, stamp: Option<i64>) -> String {
        let path = self.path(name, op);
        let ChartSize { width, height } = self.size;
        match stamp {
            Some(t) => format!("{path}?t={t}&width={width}&height={height}"),
            None => format!("{path}?width={width}&height={height}"),
        }
    }
}
