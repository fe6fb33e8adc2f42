//! Dashboard config loader (strict parsing).

pub mod schema;

use std::fs;

use metgrid_core::error::{MetGridError, Result};

pub use schema::{DashboardConfig, DashboardSection, GridSection, UpstreamSection};

pub fn load_from_file(path: &str) -> Result<DashboardConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetGridError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<DashboardConfig> {
    let cfg: DashboardConfig = serde_yaml::from_str(s)
        .map_err(|e| MetGridError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
