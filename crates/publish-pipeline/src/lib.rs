//! Bounded-concurrency publishing for file-feeder.
//!
//! The [`PublishPipeline`] issues one asynchronous update per record through
//! an [`UpdateSink`] and keeps at most `max_in_flight` of them outstanding.
//! Once the window is full, the next `publish` waits for the oldest operation
//! and then reclaims every already-finished operation at the front of the
//! ledger before issuing its own.
//!
//! # Architecture
//!
//! ```text
//!   publish(topic, value)
//!          │
//!          ▼
//! ┌──────────────────┐  window full?   ┌──────────────────────┐
//! │  PublishPipeline │ ──────────────▶ │ await oldest, evict  │
//! │                  │                 │ finished prefix      │
//! │  ledger (FIFO)   │ ◀────────────── └──────────────────────┘
//! └────────┬─────────┘
//!          │ submit
//!          ▼
//! ┌──────────────────┐
//! │    UpdateSink    │  (Kafka producer, in-memory sink, ...)
//! └──────────────────┘
//! ```
//!
//! The sink seams ([`UpdateSink`], [`TopicProvisioner`]) are the only
//! contact points with a broker; everything else is broker-agnostic.

pub mod error;
pub mod memory;
pub mod pipeline;
pub mod sink;
pub mod stats;

pub use error::{ProvisionError, UpdateError};
pub use memory::MemorySink;
pub use pipeline::{PublishPipeline, DEFAULT_MAX_IN_FLIGHT};
pub use sink::{TopicProvisioner, UpdateFuture, UpdateSink};
pub use stats::{PipelineStats, StatsSnapshot};
