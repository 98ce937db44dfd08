//! File ingestion for file-feeder.
//!
//! This crate turns files on disk into records ready to be cached and
//! published:
//!
//! - [`chunk`] - [`ChunkSupplier`], which yields either a whole file as one
//!   record or the file's lines one by one, with uniform random sampling.
//! - [`local`] - directory listing (files and subdirectories, sorted by name)
//!   and whole-file reads on the local filesystem.
//! - [`topic_path`] - mapping a file path under the source root to the topic
//!   path it feeds.
//!
//! # Example
//!
//! ```rust
//! use feeder_source::ChunkSupplier;
//!
//! let mut supplier = ChunkSupplier::new("one\ntwo\n", true);
//! assert_eq!(supplier.len(), 2);
//! assert_eq!(supplier.next().as_deref(), Some(&b"one"[..]));
//! assert_eq!(supplier.next().as_deref(), Some(&b"two"[..]));
//! assert!(supplier.next().is_none());
//! ```

pub mod chunk;
pub mod local;
pub mod topic_path;

pub use chunk::{ChunkSupplier, SampleError};
pub use local::{list_directory, read_file, remove_file, DirListing};
pub use topic_path::{derive_topic_path, join_topic, strip_extension};
