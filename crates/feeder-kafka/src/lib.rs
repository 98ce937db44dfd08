//! Kafka broker seams for file-feeder.
//!
//! [`KafkaSink`] implements both [`publish_pipeline::UpdateSink`] (through an
//! rdkafka `FutureProducer`) and [`publish_pipeline::TopicProvisioner`]
//! (through an `AdminClient`).
//!
//! Topic paths are hierarchical (`prices/eu/ABC`) while Kafka topic names are
//! flat, so each path is mapped with [`kafka_topic_name`]. The original topic
//! path travels as the message key.
//!
//! # Example
//!
//! ```rust,ignore
//! use feeder_kafka::KafkaSink;
//! use feeder_types::{TopicSpec, TopicType, TopicValue};
//! use publish_pipeline::{PublishPipeline, TopicProvisioner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let sink = KafkaSink::new("localhost:9092")?;
//!     sink.ensure_topic("prices/ABC", &TopicSpec::new(TopicType::Json)).await?;
//!
//!     let mut pipeline = PublishPipeline::new(sink, 100);
//!     pipeline.publish("prices/ABC", TopicValue::Int64(42)).await;
//!     pipeline.drain_all().await;
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod error;
pub mod sink;

pub use args::KafkaArgs;
pub use error::KafkaFeederError;
pub use sink::{kafka_topic_name, KafkaSink, DEFAULT_MESSAGE_TIMEOUT};
