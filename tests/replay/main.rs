//! Feeder integration tests.
//!
//! Every test builds a small source tree in a temporary directory and runs
//! the feeder against the in-memory broker with a fixed seed, so replay
//! order and sampling are deterministic.

mod ingest;
mod replay_loop;

use feeder_types::TopicValue;
use file_feeder::{ReplayConfig, ReplayOrchestrator};
use publish_pipeline::{MemorySink, UpdateError, UpdateFuture, UpdateSink};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

pub const SEED: u64 = 42;

pub type TestFeeder = ReplayOrchestrator<Arc<MemorySink>, Arc<MemorySink>, StdRng>;

/// Write `contents` to `relative` below `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

pub fn feeder(config: ReplayConfig, sink: &Arc<MemorySink>) -> TestFeeder {
    tracing_subscriber::fmt()
        .with_env_filter("file_feeder=debug,publish_pipeline=debug")
        .try_init()
        .ok();

    ReplayOrchestrator::new(config, sink.clone(), sink.clone(), StdRng::seed_from_u64(SEED))
}

/// Topics of every issued update, in issue order.
pub fn issued_topics(sink: &MemorySink) -> Vec<String> {
    sink.updates().into_iter().map(|(topic, _)| topic).collect()
}

/// Sink whose updates stay outstanding until [`GatedSink::release`].
pub struct GatedSink {
    open: watch::Sender<bool>,
    submitted: AtomicUsize,
}

impl GatedSink {
    pub fn new() -> Self {
        Self {
            open: watch::Sender::new(false),
            submitted: AtomicUsize::new(0),
        }
    }

    /// Complete every outstanding and future update.
    pub fn release(&self) {
        self.open.send_replace(true);
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl UpdateSink for GatedSink {
    fn submit(&self, _topic: &str, _value: TopicValue) -> UpdateFuture {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.subscribe();
        Box::pin(async move {
            let released = open.wait_for(|open| *open).await.is_ok();
            if released {
                Ok(())
            } else {
                Err(UpdateError::Closed)
            }
        })
    }
}
