//! Error types for feeder-types crate.

use thiserror::Error;

/// A record could not be converted into the configured topic type.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid integer: {0}")]
    Int(#[from] std::num::ParseIntError),

    #[error("Invalid double: {0}")]
    Double(#[from] std::num::ParseFloatError),
}
