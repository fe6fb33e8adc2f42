//! Grid data model: metric names, aggregation ops and the cells they expand to.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::url::ImageUrl;

/// Server-defined identifier for a measured quantity.
///
/// Treated as opaque: no normalisation, ordering or uniqueness is imposed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricName(String);

impl MetricName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetricName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MetricName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Client-side fixed way of summarising a metric for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationOp {
    Sum,
    Count,
    Avg,
}

impl AggregationOp {
    /// Every op, in render order.
    pub const ALL: [AggregationOp; 3] = [AggregationOp::Sum, AggregationOp::Count, AggregationOp::Avg];

    pub fn as_str(self) -> &'static str {
        match self {
            AggregationOp::Sum => "sum",
            AggregationOp::Count => "count",
            AggregationOp::Avg => "avg",
        }
    }
}

impl fmt::Display for AggregationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One grid unit: a metric paired with an op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageCell {
    pub name: MetricName,
    pub op: AggregationOp,
}

impl ImageCell {
    pub fn new(name: MetricName, op: AggregationOp) -> Self {
        Self { name, op }
    }

    /// Element identity: `{name}-{op}`.
    pub fn identity(&self) -> String {
        format!("{}-{}", self.name, self.op)
    }

    /// Alt text: `{name} {op}`.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.op)
    }

    /// Image source. `stamp` is the cache-busting value, omitted on first render.
    pub fn src(&self, url: &ImageUrl, stamp: Option<i64>) -> String {
        url.src(&self.name, self.op, stamp)
    }
}

/// Ordered expansion of metric names into cells (outer: names, inner: ops).
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    cells: Vec<ImageCell>,
}

impl GridLayout {
    pub fn new(names: &[MetricName]) -> Self {
        let mut cells = Vec::with_capacity(names.len() * AggregationOp::ALL.len());
        for name in names {
            for op in AggregationOp::ALL {
                cells.push(ImageCell::new(name.clone(), op));
            }
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[ImageCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Identities that occur more than once (only possible with repeated names).
    pub fn duplicate_identities(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        for cell in &self.cells {
            let id = cell.identity();
            if !seen.insert(id.clone()) && !dups.contains(&id) {
                dups.push(id);
            }
        }
        dups
    }
}

impl IntoIterator for GridLayout {
    type Item = ImageCell;
    type IntoIter = std::vec::IntoIter<ImageCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
