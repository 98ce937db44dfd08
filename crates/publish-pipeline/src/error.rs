//! Error types for broker operations.

use thiserror::Error;

/// Failure reported by a single update operation.
///
/// These never abort the pipeline; they are logged and counted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Update of topic '{topic}' rejected: {reason}")]
    Rejected { topic: String, reason: String },

    #[error("Connection closed")]
    Closed,
}

/// Failure to create or validate a topic. Fatal for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("Topic '{topic}' rejected: {reason}")]
    Rejected { topic: String, reason: String },

    #[error("Provisioning client error: {0}")]
    Client(String),
}
