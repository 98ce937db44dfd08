//! Command-line interface for file-feeder
//!
//! # Usage Examples
//!
//! ```bash
//! # Publish each file under ./files to Kafka once, pausing 1s between files
//! file-feeder --path files --kafka-brokers localhost:9092
//!
//! # Publish JSON lines with up to 500 unacknowledged updates, then replay
//! file-feeder --path data --split-lines --topic-type json \
//!   --max-in-flight 500 --file-interval 0 --repeat
//!
//! # Reproducible replay against the in-memory broker, with a stats file
//! file-feeder --path data --repeat --replay-passes 100 --seed 7 \
//!   --dry-run --stats-output stats.jsonl
//! ```

use anyhow::Context;
use clap::Parser;
use feeder_kafka::{KafkaArgs, KafkaSink};
use feeder_types::TopicSpec;
use file_feeder::{run_feeder, FeederArgs};
use publish_pipeline::MemorySink;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "file-feeder")]
#[command(about = "Publish a directory tree of files to a message broker and replay it as load")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    feeder: FeederArgs,

    #[command(flatten)]
    kafka: KafkaArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cancel = setup_shutdown_handler();

    let topic_spec = TopicSpec::new(cli.feeder.topic_type)
        .with_partitions(cli.kafka.partitions)
        .with_replication(cli.kafka.replication_factor);

    let metrics = if cli.feeder.dry_run {
        info!("Dry run: updates are kept in memory");
        let sink = Arc::new(MemorySink::new());
        let metrics = run_feeder(&cli.feeder, topic_spec, sink.clone(), cancel).await?;
        info!(
            "Dry run issued {} updates to {} topics",
            sink.update_count(),
            sink.topics().len()
        );
        metrics
    } else {
        info!("Publishing to Kafka at {}", cli.kafka.kafka_brokers);
        let sink = Arc::new(
            KafkaSink::from_args(&cli.kafka).context("Failed to create Kafka producer")?,
        );
        run_feeder(&cli.feeder, topic_spec, sink, cancel).await?
    };

    info!(
        "Done: {} files ingested, {} skipped, {} records published, {} decode failures, {} replay passes in {:?}",
        metrics.files_ingested,
        metrics.files_skipped,
        metrics.records_published,
        metrics.decode_failures,
        metrics.replay_passes,
        metrics.total_duration
    );
    Ok(())
}

/// Cancel the returned token on Ctrl+C.
fn setup_shutdown_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C), draining in-flight updates");
                token.cancel();
            }
            Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    cancel
}
