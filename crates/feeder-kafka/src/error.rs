//! Error types for the Kafka seams.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KafkaFeederError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

impl From<KafkaFeederError> for publish_pipeline::ProvisionError {
    fn from(err: KafkaFeederError) -> Self {
        publish_pipeline::ProvisionError::Client(err.to_string())
    }
}
