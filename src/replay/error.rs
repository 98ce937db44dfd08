use publish_pipeline::ProvisionError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a run.
///
/// Per-file and per-record problems are logged and skipped instead.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to provision topic '{topic}': {source}")]
    Provision {
        topic: String,
        #[source]
        source: ProvisionError,
    },

    #[error("Source {} is not readable: {reason}", .path.display())]
    Source { path: PathBuf, reason: String },
}
