//! Hierarchical topic cache for file-feeder.
//!
//! The `TopicTree` mirrors a slash-delimited topic namespace (itself derived
//! from a directory tree) into addressable nodes, so that the replay loop can
//! ask "which topics live next to this one?".
//!
//! # Architecture
//!
//! ```text
//!            (root)
//!              │
//!        ┌─────┴─────┐
//!        ▼           ▼
//!      "a"          "b"
//!   ┌───┴───┐        │
//!   ▼       ▼        ▼
//!  "x"     "y"      "z"
//! payload payload  payload
//! ```
//!
//! Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
//! A node's parent link is a plain id, never an owning reference; children
//! are owned top-down by their parent's ordered child list.
//!
//! # Example
//!
//! ```rust
//! use topic_tree::TopicTree;
//!
//! let mut tree = TopicTree::new();
//! let x = tree.insert("a/x", 1).unwrap();
//! tree.insert("a/y", 2).unwrap();
//!
//! assert_eq!(tree.full_path(x).as_deref(), Some("a/x"));
//! let siblings = tree.siblings_of(x);
//! assert_eq!(siblings.len(), 1);
//! assert_eq!(tree.payload(siblings[0]), Some(&2));
//! ```

pub mod error;
pub mod tree;

pub use error::TreeError;
pub use tree::{NodeId, TopicNode, TopicTree};
