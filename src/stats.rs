//! Periodic throughput reports for a running feeder

use anyhow::Result;
use publish_pipeline::{PipelineStats, StatsSnapshot};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Single stats report (one JSON line)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsEntry {
    pub timestamp: String,
    /// Updates submitted since start
    pub updates: u64,
    /// Updates submitted during the last period
    pub period_updates: u64,
    pub period_secs: f64,
    pub updates_per_sec: f64,
    pub avg_updates_per_sec: f64,
    pub failed: u64,
    pub outstanding: u64,
    pub elapsed_secs: f64,
}

impl StatsEntry {
    /// Build a report from two snapshots taken `period` apart, `elapsed`
    /// after the run started.
    pub fn between(
        previous: &StatsSnapshot,
        current: &StatsSnapshot,
        period: Duration,
        elapsed: Duration,
    ) -> Self {
        let period_updates = current.submitted.saturating_sub(previous.submitted);
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            updates: current.submitted,
            period_updates,
            period_secs: period.as_secs_f64(),
            updates_per_sec: rate(period_updates, period),
            avg_updates_per_sec: rate(current.submitted, elapsed),
            failed: current.failed,
            outstanding: current.outstanding(),
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

fn rate(count: u64, over: Duration) -> f64 {
    let secs = over.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Spawn the reporter. Logs one line per `interval` and, when `output` is
/// set, appends the same report to it as JSON. Stops after a final report
/// once `cancel` fires.
pub fn spawn_reporter(
    stats: PipelineStats,
    interval: Duration,
    output: Option<PathBuf>,
    cancel: CancellationToken,
) -> JoinHandle<Result<()>> {
    tokio::spawn(async move {
        let mut file = match &output {
            Some(path) => Some(
                tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?,
            ),
            None => None,
        };

        let start = Instant::now();
        let mut last_tick = start;
        let mut previous = stats.snapshot();

        let mut interval_timer = tokio::time::interval(interval);
        // The first tick completes immediately.
        interval_timer.tick().await;

        loop {
            let stopping = tokio::select! {
                _ = cancel.cancelled() => true,
                _ = interval_timer.tick() => false,
            };

            let now = Instant::now();
            let current = stats.snapshot();
            let entry = StatsEntry::between(
                &previous,
                &current,
                now - last_tick,
                now - start,
            );
            info!(
                "Updates: {} ({} in {:.1}s, {:.1}/sec, avg={:.1}/sec, failed={}, outstanding={})",
                entry.updates,
                entry.period_updates,
                entry.period_secs,
                entry.updates_per_sec,
                entry.avg_updates_per_sec,
                entry.failed,
                entry.outstanding
            );

            if let Some(file) = file.as_mut() {
                let json_line = serde_json::to_string(&entry)?;
                file.write_all(json_line.as_bytes()).await?;
                file.write_all(b"\n").await?;
                file.flush().await?;
            }

            if stopping {
                return Ok(());
            }
            previous = current;
            last_tick = now;
        }
    })
}
