//! Shared fixtures: fake metric sources and a throwaway upstream server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use metgrid_core::error::{MetGridError, Result};
use metgrid_core::MetricName;
use metgrid_dashboard::grid::GridSettings;
use metgrid_dashboard::source::MetricSource;

/// In-process listing with a call counter.
pub struct StaticSource {
    names: Option<Vec<MetricName>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn ok(names: &[&str]) -> Self {
        Self {
            names: Some(names.iter().map(|n| MetricName::from(*n)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self { names: None, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for StaticSource {
    async fn fetch_metric_names(&self) -> Result<Vec<MetricName>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names
            .clone()
            .ok_or_else(|| MetGridError::Transport("connection refused".into()))
    }
}

pub fn settings() -> GridSettings {
    GridSettings {
        refresh_interval: Duration::from_secs(30),
        ..GridSettings::default()
    }
}

/// Serve `app` on an ephemeral local port, returning its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn shared_counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}
