use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use metgrid_core::error::{MetGridError, Result};
use metgrid_core::{ChartSize, ImageUrl};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    pub version: u32,

    #[serde(default)]
    pub dashboard: DashboardSection,

    #[serde(default)]
    pub upstream: UpstreamSection,

    #[serde(default)]
    pub grid: GridSection,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetGridError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.dashboard.validate()?;
        self.upstream.validate()?;
        self.grid.validate()?;

        Ok(())
    }

    /// Image sources point at `grid.image_base`, falling back to the upstream server.
    pub fn image_url(&self) -> ImageUrl {
        let base = self
            .grid
            .image_base
            .clone()
            .unwrap_or_else(|| self.upstream.base_url.clone());
        ImageUrl::new(base, self.grid.chart_size())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl DashboardSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetGridError::BadConfig(format!("dashboard.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(MetGridError::BadConfig(
                "upstream.base_url must start with http:// or https://".into(),
            ));
        }
        if !(100..=60000).contains(&self.request_timeout_ms) {
            return Err(MetGridError::BadConfig(
                "upstream.request_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Prefix for chart image sources. `None` means the upstream base URL.
    #[serde(default)]
    pub image_base: Option<String>,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            image_base: None,
            width: default_width(),
            height: default_height(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

impl GridSection {
    pub fn validate(&self) -> Result<()> {
        let class = self.selector.strip_prefix('.').unwrap_or_default();
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(MetGridError::BadConfig(
                "grid.selector must be a single class selector like \".metrics\"".into(),
            ));
        }
        if !(1..=4096).contains(&self.width) || !(1..=4096).contains(&self.height) {
            return Err(MetGridError::BadConfig(
                "grid.width and grid.height must be between 1 and 4096".into(),
            ));
        }
        if !(1000..=3_600_000).contains(&self.refresh_interval_ms) {
            return Err(MetGridError::BadConfig(
                "grid.refresh_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn chart_size(&self) -> ChartSize {
        ChartSize { width: self.width, height: self.height }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8090".into()
}
fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_selector() -> String {
    ".metrics".into()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    500
}
fn default_refresh_interval_ms() -> u64 {
    30000
}
