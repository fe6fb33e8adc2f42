use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use metgrid_core::error::MetGridError;
use metgrid_core::{AggregationOp, GridLayout, ImageCell, ImageUrl, MetricName};

use crate::config::DashboardConfig;
use crate::obs::DashboardMetrics;
use crate::source::MetricSource;
use crate::surface::{CellSpec, Container, Document, Fragment, ImageHandle};

use super::phase::{GridPhase, PhaseCell};

/// Text shown in place of the grid when the listing cannot be loaded.
pub const FAILED_TO_LOAD: &str = "Failed to load metrics.";

/// Everything the grid needs besides the container and the metric names.
#[derive(Debug, Clone)]
pub struct GridSettings {
    pub selector: String,
    pub image_url: ImageUrl,
    pub refresh_interval: Duration,
    pub lazy: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            selector: ".metrics".into(),
            image_url: ImageUrl::default(),
            refresh_interval: Duration::from_secs(30),
            lazy: true,
        }
    }
}

impl GridSettings {
    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self {
            selector: cfg.grid.selector.clone(),
            image_url: cfg.image_url(),
            refresh_interval: cfg.grid.refresh_interval(),
            lazy: true,
        }
    }
}

/// Result of bringing a grid up.
pub enum GridOutcome<C: Container> {
    /// Selector matched nothing; nothing was requested.
    NoContainer,
    /// Listing failed; the container now shows `FAILED_TO_LOAD`.
    Failed(MetGridError),
    Rendered(MetricsGridController<C>),
}

impl<C: Container> GridOutcome<C> {
    pub fn into_controller(self) -> Option<MetricsGridController<C>> {
        match self {
            GridOutcome::Rendered(ctl) => Some(ctl),
            _ => None,
        }
    }
}

/// One mounted cell and the handle to its image.
pub struct MountedCell<I> {
    pub cell: ImageCell,
    pub image: I,
}

/// Outcome of a single refresh tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: usize,
    pub missing: usize,
}

/// Owns a rendered grid: its container, the metric names captured at load
/// time, the cell -> image mapping and the refresh task.
pub struct MetricsGridController<C: Container> {
    container: C,
    names: Arc<[MetricName]>,
    cells: Arc<Vec<MountedCell<C::Image>>>,
    settings: GridSettings,
    metrics: Arc<DashboardMetrics>,
    refresh: Option<JoinHandle<()>>,
}

impl<C: Container> MetricsGridController<C> {
    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn names(&self) -> &[MetricName] {
        &self.names
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &ImageCell> {
        self.cells.iter().map(|m| &m.cell)
    }

    /// Handle for the image of `(name, op)`.
    pub fn image(&self, name: &MetricName, op: AggregationOp) -> Option<&C::Image> {
        self.cells
            .iter()
            .find(|m| m.cell.name == *name && m.cell.op == op)
            .map(|m| &m.image)
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Whether the recurring refresh is still scheduled.
    pub fn is_refresh_armed(&self) -> bool {
        self.refresh.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Run one refresh tick now, stamped with the current wall clock.
    pub fn refresh_now(&self) -> RefreshReport {
        self.refresh_at(Utc::now().timestamp_millis())
    }

    pub fn refresh_at(&self, stamp: i64) -> RefreshReport {
        refresh_cells(&self.cells, &self.settings.image_url, stamp, &self.metrics)
    }

    /// Cancel the refresh task. The grid itself stays mounted.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.refresh.take() {
            handle.abort();
            tracing::debug!(cells = self.cells.len(), "grid refresh cancelled");
        }
    }
}

impl<C: Container> Drop for MetricsGridController<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Locate the container and load the grid into it.
pub async fn initialize<D: Document>(
    document: &D,
    source: &dyn MetricSource,
    settings: GridSettings,
    metrics: Arc<DashboardMetrics>,
    phase: &PhaseCell,
) -> GridOutcome<D::Container> {
    let Some(container) = document.query_selector(&settings.selector) else {
        tracing::debug!(selector = %settings.selector, "no metrics container, nothing to render");
        metrics.listing_loads.inc(&[("outcome", "no_container")]);
        return GridOutcome::NoContainer;
    };
    load_metrics(container, source, settings, metrics, phase).await
}

/// Fetch the listing once; render on success, show the fallback text on failure.
pub async fn load_metrics<C: Container>(
    container: C,
    source: &dyn MetricSource,
    settings: GridSettings,
    metrics: Arc<DashboardMetrics>,
    phase: &PhaseCell,
) -> GridOutcome<C> {
    phase.set(GridPhase::Loading);
    let started = Instant::now();
    let res = source.fetch_metric_names().await;
    metrics.listing_duration.observe(&[], started.elapsed());

    match res {
        Ok(names) => {
            metrics.listing_loads.inc(&[("outcome", "rendered")]);
            let ctl = render_metrics(container, names, settings, metrics);
            phase.set(GridPhase::Rendered);
            GridOutcome::Rendered(ctl)
        }
        Err(e) => {
            tracing::error!(error = %e, code = e.code().as_str(), "failed to load metrics");
            metrics
                .listing_loads
                .inc(&[("outcome", "failed"), ("code", e.code().as_str())]);
            container.set_text(FAILED_TO_LOAD);
            phase.set(GridPhase::Failed);
            GridOutcome::Failed(e)
        }
    }
}

/// Mount one cell per (name, op) in a single append, then arm the refresh.
///
/// Must run inside a tokio runtime (the refresh is a spawned task).
pub fn render_metrics<C: Container>(
    container: C,
    names: Vec<MetricName>,
    settings: GridSettings,
    metrics: Arc<DashboardMetrics>,
) -> MetricsGridController<C> {
    let layout = GridLayout::new(&names);
    for id in layout.duplicate_identities() {
        tracing::warn!(identity = %id, "duplicate grid cell identity");
    }

    container.clear();

    let mut fragment = Fragment::with_capacity(layout.len());
    for cell in layout.cells() {
        fragment.push(CellSpec {
            id: cell.identity(),
            alt: cell.label(),
            src: cell.src(&settings.image_url, None),
            lazy: settings.lazy,
        });
    }
    let images = container.append(fragment);

    let cells: Vec<MountedCell<C::Image>> = layout
        .into_iter()
        .zip(images)
        .map(|(cell, image)| MountedCell { cell, image })
        .collect();
    let cells = Arc::new(cells);

    metrics.grid_cells.set(&[], i64::try_from(cells.len()).unwrap_or(i64::MAX));
    tracing::info!(
        metrics = names.len(),
        cells = cells.len(),
        refresh_ms = settings.refresh_interval.as_millis() as u64,
        "metrics grid rendered"
    );

    let refresh = spawn_refresh(
        Arc::clone(&cells),
        settings.image_url.clone(),
        settings.refresh_interval,
        Arc::clone(&metrics),
    );

    MetricsGridController {
        container,
        names: names.into(),
        cells,
        settings,
        metrics,
        refresh: Some(refresh),
    }
}

fn spawn_refresh<I: ImageHandle>(
    cells: Arc<Vec<MountedCell<I>>>,
    url: ImageUrl,
    period: Duration,
    metrics: Arc<DashboardMetrics>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // first tick one full period after rendering
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let stamp = Utc::now().timestamp_millis();
            refresh_cells(&cells, &url, stamp, &metrics);
        }
    })
}

/// Rewrite every mounted image source with `t={stamp}`. Detached images are skipped.
pub fn refresh_cells<I: ImageHandle>(
    cells: &[MountedCell<I>],
    url: &ImageUrl,
    stamp: i64,
    metrics: &DashboardMetrics,
) -> RefreshReport {
    let mut report = RefreshReport::default();
    for m in cells {
        if m.image.set_src(&m.cell.src(url, Some(stamp))) {
            report.updated += 1;
        } else {
            report.missing += 1;
            tracing::debug!(identity = %m.cell.identity(), "image element gone, skipping");
        }
    }

    metrics.refresh_ticks.inc(&[]);
    metrics.refresh_cells.add(&[("result", "updated")], report.updated as u64);
    metrics.refresh_cells.add(&[("result", "missing")], report.missing as u64);
    tracing::debug!(stamp, updated = report.updated, missing = report.missing, "grid refreshed");
    report
}
