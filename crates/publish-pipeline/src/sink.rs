//! Broker seams consumed by the pipeline and the replay loop.

use crate::error::{ProvisionError, UpdateError};
use async_trait::async_trait;
use feeder_types::{TopicSpec, TopicValue};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Completion of one submitted update.
pub type UpdateFuture = BoxFuture<'static, Result<(), UpdateError>>;

/// Issues "set value on topic" operations against a broker.
///
/// `submit` must not block: it hands the update to the broker client and
/// returns a future that resolves once the broker acknowledged (or rejected)
/// it. The pipeline polls that future on its own task.
pub trait UpdateSink: Send + Sync + 'static {
    fn submit(&self, topic: &str, value: TopicValue) -> UpdateFuture;
}

/// Creates topics before anything is published to them.
///
/// Implementations treat an already existing topic as success.
#[async_trait]
pub trait TopicProvisioner: Send + Sync {
    async fn ensure_topic(&self, topic: &str, spec: &TopicSpec) -> Result<(), ProvisionError>;
}

impl<T: UpdateSink + ?Sized> UpdateSink for Arc<T> {
    fn submit(&self, topic: &str, value: TopicValue) -> UpdateFuture {
        (**self).submit(topic, value)
    }
}

#[async_trait]
impl<T: TopicProvisioner + ?Sized> TopicProvisioner for Arc<T> {
    async fn ensure_topic(&self, topic: &str, spec: &TopicSpec) -> Result<(), ProvisionError> {
        (**self).ensure_topic(topic, spec).await
    }
}
