use std::time::Duration;

/// Totals for one feeder run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayMetrics {
    pub files_ingested: u64,
    /// Files that could not be read or named and were skipped.
    pub files_skipped: u64,
    /// Records handed to the publish pipeline, ingestion and replay combined.
    pub records_published: u64,
    /// Records that failed to decode into the topic type.
    pub decode_failures: u64,
    /// Completed passes over the cache.
    pub replay_passes: u64,
    pub total_duration: Duration,
}

impl ReplayMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_published as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
