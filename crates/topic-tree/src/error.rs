//! Error types for topic tree mutations.

use thiserror::Error;

/// Errors returned by [`crate::TopicTree`] mutations.
///
/// Lookups never fail: an unknown path is simply absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Topic path is empty")]
    EmptyPath,

    #[error("The root node cannot be removed")]
    RootRemoval,
}
