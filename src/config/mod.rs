//! Command-line configuration for the feeder.

mod duration;

pub use duration::parse_duration;

use crate::replay::ReplayConfig;
use clap::Args;
use feeder_types::{TopicSpec, TopicType};
use std::path::PathBuf;
use std::time::Duration;

/// What to read, how to turn it into topics, and how fast to publish.
#[derive(Args, Clone, Debug)]
pub struct FeederArgs {
    /// File, or directory tree containing files to publish
    #[arg(long, short = 'f', env = "FEEDER_PATH", default_value = "files")]
    pub path: PathBuf,

    /// Topic path prefix for every derived topic (empty for none)
    #[arg(long, short = 't', default_value = "file")]
    pub topic_root: String,

    /// Value type of every topic: binary, json, string, int64 or double
    #[arg(long, default_value = "binary")]
    pub topic_type: TopicType,

    /// Publish each line of a file as a separate update
    #[arg(long)]
    pub split_lines: bool,

    /// Keep replaying cached records after all files were read
    #[arg(long, short = 'r')]
    pub repeat: bool,

    /// Stop replaying after this many passes over the cache
    #[arg(long, requires = "repeat")]
    pub replay_passes: Option<u64>,

    /// Pause between files (e.g. "1s", "250ms")
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub file_interval: Duration,

    /// Pause between records and between replayed updates
    #[arg(long, default_value = "0", value_parser = parse_duration)]
    pub record_interval: Duration,

    /// Maximum number of unacknowledged updates
    #[arg(long, env = "FEEDER_MAX_IN_FLIGHT", default_value = "100")]
    pub max_in_flight: usize,

    /// Wait for every update before issuing the next (same as --max-in-flight 1)
    #[arg(long)]
    pub sync: bool,

    /// Seed for replay sampling (same seed = same replay order)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delete each file once all of its records were published
    #[arg(long)]
    pub delete_after_ingest: bool,

    /// Interval between statistics reports ("0" disables reporting)
    #[arg(long, default_value = "5s", value_parser = parse_duration)]
    pub stats_interval: Duration,

    /// Append each statistics report as a JSON line to this file
    #[arg(long)]
    pub stats_output: Option<PathBuf>,

    /// Publish to an in-memory sink instead of the broker
    #[arg(long)]
    pub dry_run: bool,
}

impl FeederArgs {
    pub fn effective_max_in_flight(&self) -> usize {
        if self.sync {
            1
        } else {
            self.max_in_flight
        }
    }

    /// Build the replay configuration, taking partitioning from `topic_spec`.
    pub fn replay_config(&self, topic_spec: TopicSpec) -> ReplayConfig {
        ReplayConfig {
            source: self.path.clone(),
            topic_root: self.topic_root.clone(),
            topic_spec: TopicSpec {
                topic_type: self.topic_type,
                ..topic_spec
            },
            split_lines: self.split_lines,
            replay: self.repeat,
            replay_passes: self.replay_passes,
            file_interval: self.file_interval,
            record_interval: self.record_interval,
            max_in_flight: self.effective_max_in_flight(),
            delete_after_ingest: self.delete_after_ingest,
        }
    }
}
