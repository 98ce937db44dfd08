//! CLI argument definitions for the Kafka broker.

use clap::Args;
use std::time::Duration;

/// Kafka connection and topic creation arguments.
#[derive(Args, Clone, Debug)]
pub struct KafkaArgs {
    /// Kafka brokers (comma-separated, e.g., "localhost:9092")
    #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub kafka_brokers: String,

    /// Partitions for topics created by the feeder
    #[arg(long, default_value = "1")]
    pub partitions: i32,

    /// Replication factor for topics created by the feeder
    #[arg(long, default_value = "1")]
    pub replication_factor: i32,

    /// Delivery timeout per message, in milliseconds
    #[arg(long, default_value = "30000")]
    pub message_timeout_ms: u64,
}

impl KafkaArgs {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}
