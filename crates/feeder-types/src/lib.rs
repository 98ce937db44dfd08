//! Topic value types for file-feeder.
//!
//! Records read from files are raw bytes. Before publishing they are decoded
//! into a [`TopicValue`] according to the configured [`TopicType`]; the
//! broker layer turns a value back into a wire payload.
//!
//! # Modules
//!
//! - [`value`] - `TopicType`, `TopicValue`, decoding and wire encoding
//! - [`spec`] - `TopicSpec`, what a provisioner needs to create a topic
//! - [`error`] - `DecodeError`
//!
//! # Example
//!
//! ```rust
//! use feeder_types::{TopicType, TopicValue};
//!
//! let value = TopicType::Int64.decode(b" 42\n").unwrap();
//! assert_eq!(value, TopicValue::Int64(42));
//! assert_eq!(value.to_payload().as_ref(), b"42");
//! ```

pub mod error;
pub mod spec;
pub mod value;

pub use error::DecodeError;
pub use spec::TopicSpec;
pub use value::{TopicType, TopicValue};
