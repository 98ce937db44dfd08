//! In-memory broker used for dry runs and tests.

use crate::error::{ProvisionError, UpdateError};
use crate::sink::{TopicProvisioner, UpdateFuture, UpdateSink};
use async_trait::async_trait;
use feeder_types::{TopicSpec, TopicValue};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;

/// Records every update and provisioned topic instead of talking to a broker.
///
/// Updates are recorded at submission time, so [`MemorySink::updates`]
/// reflects the exact order in which they were issued. Individual topics can
/// be configured to fail updates or to refuse provisioning.
#[derive(Debug, Default)]
pub struct MemorySink {
    updates: Mutex<Vec<(String, TopicValue)>>,
    topics: Mutex<Vec<(String, TopicSpec)>>,
    failing: HashSet<String>,
    refused: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates on `topic` complete with an error.
    pub fn failing_topic(mut self, topic: impl Into<String>) -> Self {
        self.failing.insert(topic.into());
        self
    }

    /// Provisioning `topic` is refused.
    pub fn refusing_topic(mut self, topic: impl Into<String>) -> Self {
        self.refused.insert(topic.into());
        self
    }

    /// Every update issued so far, in submission order.
    pub fn updates(&self) -> Vec<(String, TopicValue)> {
        self.updates.lock().clone()
    }

    /// Values issued to one topic, in submission order.
    pub fn updates_for(&self, topic: &str) -> Vec<TopicValue> {
        self.updates
            .lock()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().len()
    }

    /// Topics provisioned so far, in call order.
    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl UpdateSink for MemorySink {
    fn submit(&self, topic: &str, value: TopicValue) -> UpdateFuture {
        debug!("Update {} <- {:?}", topic, value);
        self.updates.lock().push((topic.to_string(), value));

        let outcome = if self.failing.contains(topic) {
            Err(UpdateError::Rejected {
                topic: topic.to_string(),
                reason: "configured to fail".to_string(),
            })
        } else {
            Ok(())
        };
        futures::future::ready(outcome).boxed()
    }
}

#[async_trait]
impl TopicProvisioner for MemorySink {
    async fn ensure_topic(&self, topic: &str, spec: &TopicSpec) -> Result<(), ProvisionError> {
        if self.refused.contains(topic) {
            return Err(ProvisionError::Rejected {
                topic: topic.to_string(),
                reason: "configured to refuse".to_string(),
            });
        }
        let mut topics = self.topics.lock();
        if !topics.iter().any(|(t, _)| t == topic) {
            topics.push((topic.to_string(), spec.clone()));
        }
        Ok(())
    }
}
