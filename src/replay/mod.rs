//! Ingestion and replay driver.
//!
//! The [`ReplayOrchestrator`] walks the source tree, caches every file's
//! records in a [`topic_tree::TopicTree`], publishes them, and, when replay
//! is enabled, keeps republishing cached records with randomized
//! substitution until cancelled.
//!
//! ```text
//!  start ─▶ DISCOVERING ◀──────┐
//!               │               │
//!               ▼ (each file)   │
//!           INGESTING ──────────┘
//!               │ walk done
//!     ┌─────────┴──────────┐
//!     ▼ replay off         ▼ replay on
//!  DRAINING ◀─────────── REPLAYING (until cancelled / pass limit)
//!     │
//!     ▼
//!  STOPPED
//! ```

mod config;
mod error;
mod metrics;
mod orchestrator;
mod state;

pub use config::ReplayConfig;
pub use error::ReplayError;
pub use metrics::ReplayMetrics;
pub use orchestrator::ReplayOrchestrator;
pub use state::ReplayState;
