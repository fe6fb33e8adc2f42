//! Dashboard HTTP routes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use metgrid_dashboard::grid::{self, GridPhase};
use metgrid_dashboard::{app_state::AppState, config, router};

use common::StaticSource;

fn state() -> AppState {
    let cfg = config::load_from_str(
        r#"
version: 1
grid:
  image_base: "http://stats:8080"
  refresh_interval_ms: 15000
"#,
    )
    .unwrap();
    AppState::new(cfg)
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Option<String>, String) {
    let resp = router::build_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let ctype = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, ctype, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn healthz_is_always_ok() {
    let (status, _, body) = get(&state(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn readyz_waits_for_the_listing() {
    let state = state();
    let (status, _, body) = get(&state, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "uninitialized");

    state.phase_cell().set(GridPhase::Loading);
    let (status, _, body) = get(&state, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "loading");

    state.phase_cell().set(GridPhase::Failed);
    let (status, _, body) = get(&state, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn index_embeds_the_rendered_grid() {
    let state = state();
    let source = StaticSource::ok(&["cpu"]);
    let _ctl = grid::initialize(
        state.document(),
        &source,
        state.grid_settings(),
        state.metrics(),
        state.phase_cell(),
    )
    .await
    .into_controller()
    .unwrap();

    let (status, ctype, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/html"));
    assert!(body.contains("<meta http-equiv=\"refresh\" content=\"15\">"));
    assert!(body.contains("href=\"/css/style.css\""));
    assert!(body.contains("<div class=\"metrics\">"));
    assert!(body.contains("id=\"cpu-count\""));
    assert!(body.contains("alt=\"cpu avg\""));
    assert!(body.contains("src=\"http://stats:8080/metric/cpu/sum.png?width=800&amp;height=500\""));
}

#[tokio::test]
async fn index_shows_failure_text() {
    let state = state();
    let source = StaticSource::failing();
    let outcome = grid::initialize(
        state.document(),
        &source,
        state.grid_settings(),
        state.metrics(),
        state.phase_cell(),
    )
    .await;
    assert!(outcome.into_controller().is_none());

    let (_, _, body) = get(&state, "/").await;
    assert!(body.contains("<div class=\"metrics\">Failed to load metrics.</div>"));
    assert!(!body.contains("<img"));
}

#[tokio::test]
async fn stylesheet_is_served_as_css() {
    let (status, ctype, body) = get(&state(), "/css/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctype.as_deref(), Some("text/css"));
    assert!(body.contains(".image-responsive"));
}

#[tokio::test]
async fn metrics_endpoint_reports_grid_activity() {
    let state = state();
    let source = StaticSource::ok(&["cpu", "mem"]);
    let ctl = grid::initialize(
        state.document(),
        &source,
        state.grid_settings(),
        state.metrics(),
        state.phase_cell(),
    )
    .await
    .into_controller()
    .unwrap();
    ctl.refresh_at(7);

    let (status, ctype, body) = get(&state, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/plain"));
    assert!(body.contains("metgrid_listing_loads_total{outcome=\"rendered\"} 1"));
    assert!(body.contains("metgrid_grid_cells{} 6"));
    assert!(body.contains("metgrid_refresh_cells_total{result=\"updated\"} 6"));
}
