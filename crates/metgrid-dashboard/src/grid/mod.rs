//! Metrics grid: load the metric listing once, mount one chart per
//! (metric, op) pair and keep the charts fresh with a cache-busting stamp.
//!
//! Lifecycle: `Uninitialized -> Loading -> Failed | Rendered`. A failed load
//! is terminal for that controller: no cells, no refresh task.

mod controller;
mod phase;

pub use controller::{
    initialize, load_metrics, refresh_cells, render_metrics, GridOutcome, GridSettings,
    MetricsGridController, MountedCell, RefreshReport, FAILED_TO_LOAD,
};
pub use phase::{GridPhase, PhaseCell};
