use feeder_types::TopicSpec;
use publish_pipeline::DEFAULT_MAX_IN_FLIGHT;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one feeder run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// File or directory to ingest.
    pub source: PathBuf,
    /// Prefix prepended to every derived topic path.
    pub topic_root: String,
    /// Passed to the provisioner for every topic; its type drives decoding.
    pub topic_spec: TopicSpec,
    /// Publish every line as its own record.
    pub split_lines: bool,
    /// Enter the replay loop once ingestion finished.
    pub replay: bool,
    /// Leave the replay loop after this many passes.
    pub replay_passes: Option<u64>,
    pub file_interval: Duration,
    pub record_interval: Duration,
    pub max_in_flight: usize,
    pub delete_after_ingest: bool,
}

impl ReplayConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("files"),
            topic_root: String::new(),
            topic_spec: TopicSpec::default(),
            split_lines: false,
            replay: false,
            replay_passes: None,
            file_interval: Duration::ZERO,
            record_interval: Duration::ZERO,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            delete_after_ingest: false,
        }
    }
}
