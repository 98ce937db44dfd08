//! File Feeder Library
//!
//! Publishes the contents of a directory tree to a message broker as a
//! stream of topic updates, then optionally keeps replaying cached records
//! to produce sustained load.
//!
//! # Pipeline
//!
//! - Discovery walks the source tree; every file becomes one topic whose path
//!   mirrors the file's relative path (extension removed, topic root prefixed)
//! - Each file is read once, cut into records (the whole file, or one record
//!   per line) and cached in a [`topic_tree::TopicTree`]
//! - Records are decoded into the configured topic type and handed to a
//!   [`publish_pipeline::PublishPipeline`], which bounds unacknowledged updates
//! - In replay mode the cache is shuffled and republished pass after pass
//!
//! # CLI Usage
//!
//! ```bash
//! # Publish every file under ./files once, one update per file
//! file-feeder --path files --kafka-brokers localhost:9092
//!
//! # Publish line by line as JSON, then replay until Ctrl+C
//! file-feeder --path data --split-lines --topic-type json --repeat
//!
//! # Exercise the pipeline without a broker
//! file-feeder --path data --repeat --replay-passes 10 --dry-run
//! ```

pub mod config;
pub mod replay;
pub mod stats;

pub use config::FeederArgs;
pub use replay::{ReplayConfig, ReplayError, ReplayMetrics, ReplayOrchestrator, ReplayState};

use feeder_types::TopicSpec;
use publish_pipeline::{PipelineStats, TopicProvisioner, UpdateSink};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run one feeder against `broker` until the source is exhausted, the
/// replay pass limit is reached, or `cancel` fires.
///
/// `topic_spec` supplies partitioning; the topic type comes from `args`.
pub async fn run_feeder<B>(
    args: &FeederArgs,
    topic_spec: TopicSpec,
    broker: Arc<B>,
    cancel: CancellationToken,
) -> anyhow::Result<ReplayMetrics>
where
    B: UpdateSink + TopicProvisioner,
{
    let config = args.replay_config(topic_spec);
    tracing::info!(
        "Feeding {} (topic root '{}', type {}, split lines: {}, repeat: {}, max in flight: {})",
        config.source.display(),
        config.topic_root,
        config.topic_spec.topic_type,
        config.split_lines,
        config.replay,
        config.max_in_flight
    );

    let rng = match args.seed {
        Some(seed) => {
            tracing::info!("Using replay seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let stats = PipelineStats::new();
    let reporter_cancel = CancellationToken::new();
    let reporter = if args.stats_interval.is_zero() {
        None
    } else {
        Some(stats::spawn_reporter(
            stats.clone(),
            args.stats_interval,
            args.stats_output.clone(),
            reporter_cancel.clone(),
        ))
    };

    let mut orchestrator = ReplayOrchestrator::new(config, broker.clone(), broker, rng)
        .with_cancellation(cancel)
        .with_stats(stats);
    let result = orchestrator.run().await;

    reporter_cancel.cancel();
    if let Some(reporter) = reporter {
        match reporter.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Stats reporter failed: {:#}", e),
            Err(e) => tracing::warn!("Stats reporter task panicked: {}", e),
        }
    }

    Ok(result?)
}
