use super::{ReplayConfig, ReplayError, ReplayMetrics, ReplayState};
use bytes::Bytes;
use feeder_source::{derive_topic_path, list_directory, read_file, remove_file, ChunkSupplier};
use publish_pipeline::{PipelineStats, PublishPipeline, TopicProvisioner, UpdateSink};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use topic_tree::{NodeId, TopicTree};
use tracing::{debug, error, info, warn};

/// Drives discovery, ingestion, replay and the final drain.
///
/// A single task runs the whole state machine; concurrency only exists in
/// the publish pipeline. The topic cache is written while ingesting and only
/// read while replaying.
///
/// All random choices (replay order, record and sibling sampling) come from
/// the `rng` passed in, so a seeded generator gives a reproducible run.
pub struct ReplayOrchestrator<S, P, R>
where
    S: UpdateSink,
    P: TopicProvisioner,
    R: Rng,
{
    config: ReplayConfig,
    tree: TopicTree<ChunkSupplier>,
    pipeline: PublishPipeline<S>,
    provisioner: P,
    rng: R,
    cancel: CancellationToken,
    state: watch::Sender<ReplayState>,
    metrics: ReplayMetrics,
}

impl<S, P, R> ReplayOrchestrator<S, P, R>
where
    S: UpdateSink,
    P: TopicProvisioner,
    R: Rng,
{
    pub fn new(config: ReplayConfig, sink: S, provisioner: P, rng: R) -> Self {
        let pipeline = PublishPipeline::new(sink, config.max_in_flight);
        Self {
            config,
            tree: TopicTree::new(),
            pipeline,
            provisioner,
            rng,
            cancel: CancellationToken::new(),
            state: watch::Sender::new(ReplayState::Idle),
            metrics: ReplayMetrics::default(),
        }
    }

    /// Stop ingestion and replay when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report publish counters into `stats`.
    pub fn with_stats(mut self, stats: PipelineStats) -> Self {
        self.pipeline = self.pipeline.with_stats(stats);
        self
    }

    pub fn state(&self) -> ReplayState {
        *self.state.borrow()
    }

    /// Follow state transitions while the run is in progress.
    pub fn watch_state(&self) -> watch::Receiver<ReplayState> {
        self.state.subscribe()
    }

    pub fn tree(&self) -> &TopicTree<ChunkSupplier> {
        &self.tree
    }

    pub fn pipeline(&self) -> &PublishPipeline<S> {
        &self.pipeline
    }

    pub fn metrics(&self) -> &ReplayMetrics {
        &self.metrics
    }

    /// Run to completion: ingest, optionally replay, then drain.
    ///
    /// Outstanding updates are drained even when the run fails.
    pub async fn run(&mut self) -> Result<ReplayMetrics, ReplayError> {
        let start = Instant::now();

        let result = self.ingest_all().await;
        if result.is_ok() && self.config.replay && !self.cancel.is_cancelled() {
            self.replay().await;
        }

        self.transition(ReplayState::Draining);
        self.pipeline.drain_all().await;
        self.transition(ReplayState::Stopped);
        self.metrics.total_duration = start.elapsed();

        if let Err(e) = result {
            error!("Feeder run failed: {}", e);
            return Err(e);
        }
        info!(
            "Feeder finished: {} files, {} records in {:?} ({:.2} records/sec)",
            self.metrics.files_ingested,
            self.metrics.records_published,
            self.metrics.total_duration,
            self.metrics.records_per_second()
        );
        Ok(self.metrics.clone())
    }

    /// Walk the source and ingest every file.
    ///
    /// Each directory's files are ingested (sorted by name) before its
    /// subdirectories are visited (sorted by name). A directory reached a
    /// second time through a symlink is skipped.
    pub async fn ingest_all(&mut self) -> Result<(), ReplayError> {
        self.transition(ReplayState::Discovering);
        let root = self.config.source.clone();

        let metadata = tokio::fs::metadata(&root)
            .await
            .map_err(|e| ReplayError::Source {
                path: root.clone(),
                reason: e.to_string(),
            })?;
        if metadata.is_file() {
            return self.ingest_file(&root).await;
        }

        // Listings follow symlinks, so a link back to an ancestor would be
        // walked forever without this.
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut pending: Vec<PathBuf> = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            if self.cancel.is_cancelled() {
                info!("Discovery cancelled");
                break;
            }

            let canonical = tokio::fs::canonicalize(&dir)
                .await
                .unwrap_or_else(|_| dir.clone());
            if !visited.insert(canonical) {
                warn!("Skipping {}: directory already visited", dir.display());
                continue;
            }

            let listing = match list_directory(&dir).await {
                Ok(listing) => listing,
                Err(e) if dir == root => {
                    return Err(ReplayError::Source {
                        path: root,
                        reason: format!("{e:#}"),
                    });
                }
                Err(e) => {
                    warn!("Skipping directory {}: {:#}", dir.display(), e);
                    continue;
                }
            };

            for file in &listing.files {
                if self.cancel.is_cancelled() {
                    break;
                }
                self.ingest_file(file).await?;
                self.pause(self.config.file_interval).await;
            }

            pending.extend(listing.dirs.into_iter().rev());
        }

        info!(
            "Discovery complete: {} files ingested, {} skipped, {} topics cached",
            self.metrics.files_ingested,
            self.metrics.files_skipped,
            self.tree.payload_bearing().len()
        );
        Ok(())
    }

    /// Read one file, cache its records and publish each of them.
    ///
    /// Unreadable files are logged and skipped; only provisioning failures
    /// are returned.
    pub async fn ingest_file(&mut self, path: &Path) -> Result<(), ReplayError> {
        self.transition(ReplayState::Ingesting);
        let outcome = self.ingest_file_inner(path).await;
        self.transition(ReplayState::Discovering);
        outcome
    }

    async fn ingest_file_inner(&mut self, path: &Path) -> Result<(), ReplayError> {
        let Some(topic) = derive_topic_path(&self.config.source, path, &self.config.topic_root)
        else {
            warn!("Cannot derive a topic for {}, skipping", path.display());
            self.metrics.files_skipped += 1;
            return Ok(());
        };

        let bytes = match read_file(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                self.metrics.files_skipped += 1;
                return Ok(());
            }
        };

        self.provisioner
            .ensure_topic(&topic, &self.config.topic_spec)
            .await
            .map_err(|source| ReplayError::Provision {
                topic: topic.clone(),
                source,
            })?;

        let size = bytes.len();
        let supplier = ChunkSupplier::new(bytes, self.config.split_lines);
        info!(
            "Processing file: {} -> '{}' ({} bytes, {} records)",
            path.display(),
            topic,
            size,
            supplier.len()
        );

        let node = match self.tree.insert(&topic, supplier) {
            Ok(node) => node,
            Err(e) => {
                warn!("Cannot cache {} as '{}': {}", path.display(), topic, e);
                self.metrics.files_skipped += 1;
                return Ok(());
            }
        };

        let mut first = true;
        while let Some(record) = self.tree.payload_mut(node).and_then(Iterator::next) {
            if !first {
                self.pause(self.config.record_interval).await;
            }
            first = false;
            if !self.publish_record(&topic, &record).await {
                debug!("Ingestion of {} interrupted", path.display());
                return Ok(());
            }
        }
        self.metrics.files_ingested += 1;

        if self.config.delete_after_ingest {
            if let Err(e) = remove_file(path).await {
                warn!("{:#}", e);
            }
        }
        Ok(())
    }

    /// Republish cached records pass after pass until cancelled or the pass
    /// limit is reached. Topics cached without any record are not replayed;
    /// if there are no others, replay ends immediately.
    pub async fn replay(&mut self) {
        self.transition(ReplayState::Replaying);
        info!("Replaying records from cache");

        'passes: loop {
            if self.cancel.is_cancelled() {
                break;
            }
            if let Some(limit) = self.config.replay_passes {
                if self.metrics.replay_passes >= limit {
                    break;
                }
            }

            let mut nodes: Vec<NodeId> = self
                .tree
                .payload_bearing()
                .into_iter()
                .filter(|&node| self.tree.payload(node).is_some_and(|s| !s.is_empty()))
                .collect();
            if nodes.is_empty() {
                warn!("Nothing cached, nothing to replay");
                break;
            }
            nodes.shuffle(&mut self.rng);

            for node in nodes {
                if self.cancel.is_cancelled() {
                    break 'passes;
                }
                self.pause(self.config.record_interval).await;

                let (Some(topic), Some(record)) = (self.tree.full_path(node), self.select_record(node))
                else {
                    continue;
                };
                if !self.publish_record(&topic, &record).await {
                    break 'passes;
                }
            }

            self.metrics.replay_passes += 1;
            debug!("Replay pass {} complete", self.metrics.replay_passes);
            tokio::task::yield_now().await;
        }
    }

    /// Choose the record to republish for `node`.
    ///
    /// - several records of its own: a uniform sample of them;
    /// - otherwise a uniformly chosen payload-bearing sibling's record;
    /// - no such sibling: its own single record.
    pub fn select_record(&mut self, node: NodeId) -> Option<Bytes> {
        let own = self.tree.payload(node)?;
        if own.len() > 1 {
            return own.sample(&mut self.rng).ok();
        }

        let siblings: Vec<NodeId> = self
            .tree
            .siblings_of(node)
            .into_iter()
            .filter(|&sibling| self.tree.payload(sibling).is_some_and(|s| !s.is_empty()))
            .collect();

        if let Some(&sibling) = siblings.choose(&mut self.rng) {
            let chosen = self.tree.payload(sibling)?;
            if chosen.len() > 1 {
                return chosen.sample(&mut self.rng).ok();
            }
            return chosen.records().first().cloned();
        }

        own.records().first().cloned()
    }

    /// Decode and publish one record. Returns `false` when cancelled while
    /// waiting for the in-flight window.
    async fn publish_record(&mut self, topic: &str, raw: &[u8]) -> bool {
        let value = match self.config.topic_spec.topic_type.decode(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping record for '{}': {}", topic, e);
                self.metrics.decode_failures += 1;
                return true;
            }
        };

        let cancel = self.cancel.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = self.pipeline.publish(topic, value) => {
                self.metrics.records_published += 1;
                true
            }
        }
    }

    async fn pause(&self, interval: Duration) {
        if interval.is_zero() {
            return;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = tokio::time::sleep(interval) => {}
        }
    }

    fn transition(&mut self, next: ReplayState) {
        let current = self.state();
        if current != next {
            debug!("Feeder state {} -> {}", current, next);
            self.state.send_replace(next);
        }
    }
}
