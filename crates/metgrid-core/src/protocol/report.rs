//! Collector report payload (`POST /metric`).
//!
//! ```json
//! { "system.cpu.percent": { "count": 10, "value": 654.3 } }
//! ```
//! `value` is the sum of the samples in the window, so avg = value / count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MetGridError, Result};

/// Running sum of one metric's samples over a report window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub count: u64,
    pub value: f64,
}

impl SampleWindow {
    pub fn avg(&self) -> Option<f64> {
        (self.count > 0).then(|| self.value / self.count as f64)
    }
}

/// One report: metric name -> window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricReport {
    windows: BTreeMap<String, SampleWindow>,
}

impl MetricReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the window for `name`.
    pub fn add(&mut self, name: &str, sample: f64) {
        let w = self
            .windows
            .entry(name.to_string())
            .or_insert(SampleWindow { count: 0, value: 0.0 });
        w.count += 1;
        w.value += sample;
    }

    pub fn get(&self, name: &str) -> Option<&SampleWindow> {
        self.windows.get(name)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Hand out the current window and start a new one.
    pub fn take(&mut self) -> MetricReport {
        std::mem::take(self)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| MetGridError::Internal(format!("encode report: {e}")))
    }
}
