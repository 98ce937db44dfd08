//! Publish pipeline with a bounded in-flight window.

use crate::sink::UpdateSink;
use crate::stats::PipelineStats;
use feeder_types::TopicValue;
use std::collections::VecDeque;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default number of outstanding updates.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 100;

/// Issues updates through an [`UpdateSink`] while capping how many are
/// outstanding at once.
///
/// Each submitted operation runs on its own task; the pipeline keeps the task
/// handles in submission order. Only the driver mutates the ledger (it needs
/// `&mut self`), while completion is observed through the handles, so no lock
/// sits between `publish` and the tasks reporting completion.
///
/// Eviction only ever removes a contiguous prefix of finished operations: an
/// operation that finished early stays in the ledger until everything ahead
/// of it has finished too.
pub struct PublishPipeline<S: UpdateSink> {
    sink: S,
    max_in_flight: usize,
    in_flight: VecDeque<JoinHandle<()>>,
    stats: PipelineStats,
}

impl<S: UpdateSink> PublishPipeline<S> {
    /// Create a pipeline. A window of 0 or 1 makes publishing synchronous:
    /// every update waits for the previous one before being issued.
    pub fn new(sink: S, max_in_flight: usize) -> Self {
        Self {
            sink,
            max_in_flight: max_in_flight.max(1),
            in_flight: VecDeque::new(),
            stats: PipelineStats::new(),
        }
    }

    /// Share counters with an existing [`PipelineStats`].
    pub fn with_stats(mut self, stats: PipelineStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Operations submitted and not yet evicted from the ledger.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Issue one update, waiting first if the window is full.
    ///
    /// Cancel safe: if the returned future is dropped while waiting for the
    /// window, nothing has been submitted and the ledger is unchanged.
    pub async fn publish(&mut self, topic: &str, value: TopicValue) {
        if self.in_flight.len() >= self.max_in_flight {
            self.wait_for_oldest().await;
            self.evict_finished();
        }

        let operation = self.sink.submit(topic, value);
        self.stats.record_submitted();

        let stats = self.stats.clone();
        let topic = topic.to_string();
        let handle = tokio::spawn(async move {
            match operation.await {
                Ok(()) => stats.record_completed(),
                Err(e) => {
                    warn!("Update of topic '{}' failed: {}", topic, e);
                    stats.record_failed();
                }
            }
        });
        self.in_flight.push_back(handle);
    }

    /// Wait for every outstanding operation, oldest first.
    pub async fn drain_all(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("Draining {} in-flight updates", self.in_flight.len());
        }
        while !self.in_flight.is_empty() {
            self.wait_for_oldest().await;
            self.in_flight.pop_front();
        }
    }

    async fn wait_for_oldest(&mut self) {
        if let Some(oldest) = self.in_flight.front_mut() {
            if let Err(e) = oldest.await {
                warn!("Update task ended abnormally: {}", e);
            }
        }
    }

    fn evict_finished(&mut self) {
        let before = self.in_flight.len();
        while self
            .in_flight
            .front()
            .is_some_and(|handle| handle.is_finished())
        {
            self.in_flight.pop_front();
        }
        debug!(
            "Evicted {} finished updates, {} still in flight",
            before - self.in_flight.len(),
            self.in_flight.len()
        );
    }
}

impl<S: UpdateSink> Drop for PublishPipeline<S> {
    fn drop(&mut self) {
        if !self.in_flight.is_empty() {
            warn!(
                "Publish pipeline dropped with {} updates still in flight",
                self.in_flight.len()
            );
        }
    }
}
