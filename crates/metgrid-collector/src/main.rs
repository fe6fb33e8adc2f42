//! metgrid collector
//!
//! - Samples the host once per second
//! - Posts the aggregated window every `--report` seconds
//! - Stops on Ctrl-C / SIGTERM

use std::time::Duration;

use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{fmt, EnvFilter};

use metgrid_collector::{CollectorArgs, Reporter, Sampler, SysinfoProbe};
use metgrid_core::error::Result;
use metgrid_core::protocol::report::MetricReport;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = CollectorArgs::parse();
    args.validate()?;

    let reporter = Reporter::new(args.endpoint())?;
    let mut sampler = Sampler::new(SysinfoProbe::new());
    let mut window = MetricReport::new();

    let mut sample_tick = tokio::time::interval(Duration::from_secs(1));
    sample_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut report_tick = tokio::time::interval_at(
        tokio::time::Instant::now() + args.report_every(),
        args.report_every(),
    );
    report_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    tracing::info!(endpoint = %reporter.endpoint(), report_secs = args.report, "metgrid-collector starting");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = sample_tick.tick() => sampler.sample_into(&mut window),
            _ = report_tick.tick() => {
                let batch = window.take();
                if batch.is_empty() {
                    continue;
                }
                if let Err(e) = reporter.post(&batch).await {
                    tracing::warn!(error = %e, endpoint = %reporter.endpoint(), "report failed");
                }
            }
        }
    }

    tracing::info!("metgrid-collector stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
