//! Grid rendering and refresh behaviour.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use metgrid_core::{AggregationOp, MetricName};
use metgrid_dashboard::grid::{self, GridPhase, PhaseCell};
use metgrid_dashboard::obs::DashboardMetrics;
use metgrid_dashboard::surface::{Container, Document, ImageHandle, MemoryContainer, MemoryDocument};

use common::{settings, StaticSource};

async fn rendered(
    names: &[&str],
) -> (MemoryDocument, grid::MetricsGridController<MemoryContainer>, Arc<DashboardMetrics>) {
    let doc = MemoryDocument::with_container("metrics");
    let source = StaticSource::ok(names);
    let metrics = Arc::new(DashboardMetrics::default());
    let phase = PhaseCell::new();
    let outcome = grid::initialize(&doc, &source, settings(), Arc::clone(&metrics), &phase).await;
    assert_eq!(phase.get(), GridPhase::Rendered);
    let ctl = outcome.into_controller().expect("grid must render");
    (doc, ctl, metrics)
}

#[tokio::test]
async fn cpu_and_mem_render_six_cells_in_order() {
    let (doc, ctl, metrics) = rendered(&["cpu", "mem"]).await;
    let container = doc.query_selector(".metrics").unwrap();
    let images = container.images();

    let ids: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["cpu-sum", "cpu-count", "cpu-avg", "mem-sum", "mem-count", "mem-avg"]);

    for img in &images {
        let (name, op) = img.id.split_once('-').unwrap();
        assert_eq!(img.alt, format!("{name} {op}"));
        assert!(img.src.starts_with(&format!("/metric/{name}/")), "{}", img.src);
        assert_eq!(img.src, format!("/metric/{name}/{op}.png?width=800&height=500"));
        assert!(img.lazy);
    }

    // clear + one batched append
    assert_eq!(container.mutations(), 2);
    assert_eq!(ctl.cell_count(), 6);
    assert_eq!(metrics.grid_cells.get(&[]), 6);
    assert!(ctl.is_refresh_armed());
}

#[tokio::test]
async fn n_names_give_n_times_three_unique_cells() {
    for n in [1usize, 2, 7, 25] {
        let owned: Vec<String> = (0..n).map(|i| format!("metric.{i}")).collect();
        let names: Vec<&str> = owned.iter().map(String::as_str).collect();
        let (doc, ctl, _) = rendered(&names).await;

        let images = doc.query_selector(".metrics").unwrap().images();
        assert_eq!(images.len(), n * 3);
        let unique: HashSet<&str> = images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(unique.len(), n * 3);
        assert_eq!(ctl.names().len(), n);
    }
}

#[tokio::test]
async fn empty_listing_renders_nothing_but_still_arms_refresh() {
    let (doc, ctl, metrics) = rendered(&[]).await;
    let container = doc.query_selector(".metrics").unwrap();

    assert!(container.images().is_empty());
    assert_eq!(container.text_content(), "");
    assert_eq!(ctl.cell_count(), 0);
    assert!(ctl.is_refresh_armed());
    assert_eq!(ctl.refresh_now(), grid::RefreshReport { updated: 0, missing: 0 });
    assert_eq!(metrics.listing_loads.get(&[("outcome", "rendered")]), 1);
}

#[tokio::test]
async fn previous_content_is_replaced() {
    let doc = MemoryDocument::with_container("metrics");
    let container = doc.query_selector(".metrics").unwrap();
    container.set_text("Loading...");

    let source = StaticSource::ok(&["cpu"]);
    let ctl = grid::initialize(&doc, &source, settings(), Arc::default(), &PhaseCell::new())
        .await
        .into_controller()
        .unwrap();

    assert_eq!(container.text_content(), "");
    assert_eq!(container.images().len(), 3);
    drop(ctl);
}

#[tokio::test]
async fn refresh_only_changes_the_stamp() {
    let (doc, ctl, metrics) = rendered(&["cpu", "disk io"]).await;
    let container = doc.query_selector(".metrics").unwrap();
    let before = container.images();

    for stamp in [1_000_i64, 2_000, 3_000] {
        let report = ctl.refresh_at(stamp);
        assert_eq!(report, grid::RefreshReport { updated: 6, missing: 0 });

        let after = container.images();
        assert_eq!(after.len(), before.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.alt, b.alt);
            let path = b.src.split('?').next().unwrap();
            assert_eq!(a.src, format!("{path}?t={stamp}&width=800&height=500"));
        }
    }

    assert_eq!(metrics.refresh_ticks.get(&[]), 3);
    assert_eq!(metrics.refresh_cells.get(&[("result", "updated")]), 18);
    assert!(before.iter().any(|i| i.src.starts_with("/metric/disk%20io/")));
}

#[tokio::test]
async fn refresh_skips_cells_removed_from_the_document() {
    let (doc, ctl, metrics) = rendered(&["cpu", "mem"]).await;
    let container = doc.query_selector(".metrics").unwrap();
    assert!(container.remove_image("mem-count"));

    let report = ctl.refresh_at(42);
    assert_eq!(report, grid::RefreshReport { updated: 5, missing: 1 });
    assert!(container.image("mem-avg").unwrap().src.contains("t=42"));

    // later ticks keep going
    let report = ctl.refresh_at(43);
    assert_eq!(report.updated, 5);
    assert!(container.image("cpu-sum").unwrap().src.contains("t=43"));
    assert_eq!(metrics.refresh_cells.get(&[("result", "missing")]), 2);
}

#[tokio::test]
async fn handles_are_mapped_by_name_and_op() {
    let (doc, ctl, _) = rendered(&["cpu"]).await;
    let handle = ctl.image(&MetricName::from("cpu"), AggregationOp::Avg).unwrap();
    assert!(handle.set_src("/custom.png"));
    let container = doc.query_selector(".metrics").unwrap();
    assert_eq!(container.image("cpu-avg").unwrap().src, "/custom.png");
    assert!(ctl.image(&MetricName::from("mem"), AggregationOp::Avg).is_none());
}

#[tokio::test(start_paused = true)]
async fn timer_refreshes_every_interval_until_disposed() {
    let (doc, mut ctl, metrics) = rendered(&["cpu"]).await;
    let container = doc.query_selector(".metrics").unwrap();

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert!(container.images().iter().all(|i| !i.src.contains("t=")));
    assert_eq!(metrics.refresh_ticks.get(&[]), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(container.images().iter().all(|i| i.src.contains("?t=")));
    assert_eq!(metrics.refresh_ticks.get(&[]), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(metrics.refresh_ticks.get(&[]), 2);

    ctl.dispose();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(metrics.refresh_ticks.get(&[]), 2);
    assert!(!ctl.is_refresh_armed());

    // the grid itself outlives the timer
    assert_eq!(container.images().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_stops_the_timer() {
    let (_doc, ctl, metrics) = rendered(&["cpu"]).await;
    drop(ctl);
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(metrics.refresh_ticks.get(&[]), 0);
}
