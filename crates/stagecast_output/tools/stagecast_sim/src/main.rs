use anyhow::{Context, Result};
use stagecast_output::output::{DropReason, NoticeKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stagecast_sim::config::SimConfig;
use stagecast_sim::scenario;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("STAGECAST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = SimConfig::from_args();
    let report = scenario::run(&config)
        .await
        .with_context(|| format!("run scenario {}", config.scenario.label()))?;

    info!(
        scenario = report.scenario.label(),
        final_phase = report.final_phase.label(),
        painted = ?report.painted,
        queued = report.count(NoticeKind::Queued),
        accelerated = report.count(NoticeKind::Accelerated),
        superseded = report.count(NoticeKind::Dropped(DropReason::Superseded)),
        "scenario finished"
    );
    Ok(())
}
