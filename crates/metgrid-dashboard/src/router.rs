//! Axum router wiring.
//!
//! - `/`               : grid page
//! - `/css/style.css`  : stylesheet
//! - `/healthz`, `/readyz`, `/metrics` : ops

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, page};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/css/style.css", get(page::stylesheet))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
