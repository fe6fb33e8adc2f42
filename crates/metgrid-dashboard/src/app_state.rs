//! Shared application state for the metgrid dashboard.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::grid::{GridPhase, GridSettings, PhaseCell};
use crate::obs::DashboardMetrics;
use crate::surface::{Document, MemoryContainer, MemoryDocument};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<DashboardConfig>,
    document: MemoryDocument,
    phase: PhaseCell,
    metrics: Arc<DashboardMetrics>,
}

impl AppState {
    /// Build state with an empty document holding the configured container.
    pub fn new(cfg: DashboardConfig) -> Self {
        let document = MemoryDocument::new();
        if let Some(class) = cfg.grid.selector.strip_prefix('.') {
            document.add_container(class);
        }
        Self {
            cfg: Arc::new(cfg),
            document,
            phase: PhaseCell::new(),
            metrics: Arc::new(DashboardMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &DashboardConfig {
        &self.cfg
    }

    pub fn grid_settings(&self) -> GridSettings {
        GridSettings::from_config(&self.cfg)
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    pub fn container(&self) -> Option<MemoryContainer> {
        self.document.query_selector(&self.cfg.grid.selector)
    }

    pub fn phase(&self) -> GridPhase {
        self.phase.get()
    }

    pub fn phase_cell(&self) -> &PhaseCell {
        &self.phase
    }

    pub fn metrics(&self) -> Arc<DashboardMetrics> {
        Arc::clone(&self.metrics)
    }
}
