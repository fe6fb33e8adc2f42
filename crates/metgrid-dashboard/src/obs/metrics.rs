//! Labelled metric families backed by `DashMap`.
//!
//! Label sets are flattened into sorted key vectors so rendering order within
//! a series is deterministic. Histogram buckets are fixed in milliseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// A metric family: one value per distinct label set.
struct Family<V> {
    series: DashMap<LabelKey, V>,
}

impl<V: Default> Default for Family<V> {
    fn default() -> Self {
        Self { series: DashMap::new() }
    }
}

impl<V: Default> Family<V> {
    fn with<R>(&self, labels: &[(&str, &str)], f: impl FnOnce(&V) -> R) -> R {
        let entry = self.series.entry(label_key(labels)).or_default();
        f(entry.value())
    }

    fn each(&self, mut f: impl FnMut(&LabelKey, &V)) {
        let mut rows: Vec<_> = self.series.iter().collect();
        rows.sort_by(|a, b| a.key().cmp(b.key()));
        for r in rows {
            f(r.key(), r.value());
        }
    }
}

#[derive(Default)]
pub struct CounterVec(Family<AtomicU64>);

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        self.0.with(labels, |c| c.fetch_add(v, Ordering::Relaxed));
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.0
            .series
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        self.0.each(|key, c| {
            let _ = writeln!(out, "{name}{{{}}} {}", label_str(key), c.load(Ordering::Relaxed));
        });
    }
}

#[derive(Default)]
pub struct GaugeVec(Family<AtomicI64>);

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        self.0.with(labels, |g| g.store(v, Ordering::Relaxed));
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.0
            .series
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        self.0.each(|key, g| {
            let _ = writeln!(out, "{name}{{{}}} {}", label_str(key), g.load(Ordering::Relaxed));
        });
    }
}

// 5ms .. 10s
const BUCKETS_MILLIS: [u64; 8] = [5, 25, 100, 250, 500, 1_000, 5_000, 10_000];

#[derive(Default)]
struct Buckets {
    count: AtomicU64,
    sum: AtomicU64,
    le: [AtomicU64; BUCKETS_MILLIS.len()],
}

#[derive(Default)]
pub struct HistogramVec(Family<Buckets>);

impl HistogramVec {
    /// Observe a duration (millisecond scale, cumulative buckets).
    pub fn observe(&self, labels: &[(&str, &str)], d: Duration) {
        let millis = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        self.0.with(labels, |h| {
            h.count.fetch_add(1, Ordering::Relaxed);
            h.sum.fetch_add(millis, Ordering::Relaxed);
            for (i, &b) in BUCKETS_MILLIS.iter().enumerate() {
                if millis <= b {
                    h.le[i].fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        self.0.each(|key, h| {
            let labels = label_str(key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };
            for (i, le) in BUCKETS_MILLIS.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{name}_bucket{{{prefix}le=\"{le}\"}} {}",
                    h.le[i].load(Ordering::Relaxed)
                );
            }
            let count = h.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{name}_sum{{{labels}}} {}", h.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
        });
    }
}

#[derive(Default)]
pub struct DashboardMetrics {
    /// Listing loads by `outcome` (`rendered`, `failed`, `no_container`).
    pub listing_loads: CounterVec,
    pub listing_duration: HistogramVec, // milliseconds
    pub refresh_ticks: CounterVec,
    /// Cells touched by refresh, by `result` (`updated`, `missing`).
    pub refresh_cells: CounterVec,
    pub grid_cells: GaugeVec,
}

impl DashboardMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.listing_loads.render("metgrid_listing_loads_total", &mut out);
        self.listing_duration.render("metgrid_listing_duration_millis", &mut out);
        self.refresh_ticks.render("metgrid_refresh_ticks_total", &mut out);
        self.refresh_cells.render("metgrid_refresh_cells_total", &mut out);
        self.grid_cells.render("metgrid_grid_cells", &mut out);
        out
    }
}
