//! Kafka producer and admin client behind the feeder's broker seams.

use crate::args::KafkaArgs;
use crate::error::KafkaFeederError;
use async_trait::async_trait;
use feeder_types::{TopicSpec, TopicValue};
use futures::FutureExt;
use publish_pipeline::{ProvisionError, TopicProvisioner, UpdateError, UpdateFuture, UpdateSink};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::info;

/// Default delivery timeout per message.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Map a hierarchical topic path onto a legal Kafka topic name.
///
/// `/` becomes `.`. ASCII letters, digits and `-` are kept. Every other
/// character, including a literal `.` or `_`, is written as `_` plus the
/// lowercase hex of each of its UTF-8 bytes, so distinct paths never share a
/// name: `a/b` is `a.b` while `a.b` is `a_2eb`.
pub fn kafka_topic_name(topic_path: &str) -> String {
    let mut name = String::with_capacity(topic_path.len());
    for c in topic_path.trim_matches('/').chars() {
        match c {
            '/' => name.push('.'),
            c if c.is_ascii_alphanumeric() || c == '-' => name.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    name.push_str(&format!("_{byte:02x}"));
                }
            }
        }
    }
    name
}

/// Publishes topic updates to Kafka and creates topics on demand.
pub struct KafkaSink {
    producer: FutureProducer,
    admin: AdminClient<DefaultClientContext>,
    brokers: String,
}

impl KafkaSink {
    /// Create a sink with the default delivery timeout.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (e.g., "localhost:9092")
    pub fn new(brokers: &str) -> Result<Self, KafkaFeederError> {
        Self::with_message_timeout(brokers, DEFAULT_MESSAGE_TIMEOUT)
    }

    pub fn from_args(args: &KafkaArgs) -> Result<Self, KafkaFeederError> {
        Self::with_message_timeout(&args.kafka_brokers, args.message_timeout())
    }

    pub fn with_message_timeout(
        brokers: &str,
        message_timeout: Duration,
    ) -> Result<Self, KafkaFeederError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", message_timeout.as_millis().to_string())
            .set("queue.buffering.max.messages", "100000")
            .set("queue.buffering.max.kbytes", "1048576")
            .set("batch.size", "65536")
            .set("linger.ms", "5")
            .create()?;
        let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;

        Ok(Self {
            producer,
            admin,
            brokers: brokers.to_string(),
        })
    }

    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

impl UpdateSink for KafkaSink {
    /// Enqueue the record on the producer immediately, so Kafka sees updates
    /// in submission order, and return the delivery acknowledgement.
    fn submit(&self, topic: &str, value: TopicValue) -> UpdateFuture {
        let topic_name = kafka_topic_name(topic);
        let payload = value.to_payload();
        let record = FutureRecord::to(&topic_name)
            .key(topic)
            .payload(&payload[..]);

        match self.producer.send_result(record) {
            Ok(delivery) => async move {
                match delivery.await {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err((err, _))) => Err(UpdateError::Broker(err.to_string())),
                    Err(_) => Err(UpdateError::Closed),
                }
            }
            .boxed(),
            Err((err, _)) => futures::future::ready(Err(UpdateError::Broker(err.to_string()))).boxed(),
        }
    }
}

#[async_trait]
impl TopicProvisioner for KafkaSink {
    async fn ensure_topic(&self, topic: &str, spec: &TopicSpec) -> Result<(), ProvisionError> {
        let topic_name = kafka_topic_name(topic);
        let new_topic = NewTopic::new(
            &topic_name,
            spec.partitions,
            TopicReplication::Fixed(spec.replication),
        );
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

        match self.admin.create_topics(&[new_topic], &opts).await {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(name) => {
                            info!("Topic '{}' created for '{}'", name, topic);
                        }
                        Err((name, err)) => {
                            let err_str = err.to_string();
                            if err_str.contains("already exists")
                                || err_str.contains("TopicExistsException")
                            {
                                info!("Topic '{}' already exists", name);
                            } else {
                                return Err(ProvisionError::Rejected {
                                    topic: topic.to_string(),
                                    reason: format!("Failed to create topic {name}: {err}"),
                                });
                            }
                        }
                    }
                }
            }
            Err(e) => {
                return Err(KafkaFeederError::TopicCreation(format!(
                    "Failed to create topic {topic_name}: {e}"
                ))
                .into());
            }
        }

        Ok(())
    }
}
