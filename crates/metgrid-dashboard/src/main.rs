//! metgrid dashboard
//!
//! - Loads `metgrid.yaml` (or the path given as the first argument)
//! - Fetches the metric listing once and mounts the chart grid
//! - Serves the grid page plus ops endpoints until Ctrl-C

use tracing_subscriber::{fmt, EnvFilter};

use metgrid_core::error::{MetGridError, Result};
use metgrid_dashboard::{app_state::AppState, config, grid, router, source::HttpMetricSource};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "metgrid.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.dashboard.listen_addr()?;

    let source = HttpMetricSource::new(&cfg.upstream.base_url, cfg.upstream.request_timeout())?;
    let state = AppState::new(cfg);

    let grid_state = state.clone();
    let grid_task = tokio::spawn(async move {
        grid::initialize(
            grid_state.document(),
            &source,
            grid_state.grid_settings(),
            grid_state.metrics(),
            grid_state.phase_cell(),
        )
        .await
        .into_controller()
    });

    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "metgrid-dashboard starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MetGridError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MetGridError::Internal(format!("server failed: {e}")))?;

    if grid_task.is_finished() {
        if let Ok(Some(mut ctl)) = grid_task.await {
            ctl.dispose();
        }
    } else {
        grid_task.abort();
    }
    tracing::info!("metgrid-dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
        std::future::pending::<()>().await;
    }
}
