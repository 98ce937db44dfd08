//! Topic provisioning parameters.

use crate::value::TopicType;
use serde::{Deserialize, Serialize};

/// What a provisioner needs to know to create a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub topic_type: TopicType,
    /// Number of partitions, for brokers that partition topics.
    pub partitions: i32,
    /// Replication factor, for brokers that replicate topics.
    pub replication: i32,
}

impl TopicSpec {
    pub fn new(topic_type: TopicType) -> Self {
        Self {
            topic_type,
            ..Self::default()
        }
    }

    pub fn with_partitions(mut self, partitions: i32) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_replication(mut self, replication: i32) -> Self {
        self.replication = replication;
        self
    }
}

impl Default for TopicSpec {
    fn default() -> Self {
        Self {
            topic_type: TopicType::default(),
            partitions: 1,
            replication: 1,
        }
    }
}
