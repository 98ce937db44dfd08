//! Typed topic values.

use crate::error::DecodeError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Value type carried by every topic of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    #[default]
    Binary,
    Json,
    String,
    Int64,
    Double,
}

impl std::fmt::Display for TopicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicType::Binary => write!(f, "binary"),
            TopicType::Json => write!(f, "json"),
            TopicType::String => write!(f, "string"),
            TopicType::Int64 => write!(f, "int64"),
            TopicType::Double => write!(f, "double"),
        }
    }
}

impl std::str::FromStr for TopicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bytes" => Ok(TopicType::Binary),
            "json" => Ok(TopicType::Json),
            "string" | "text" => Ok(TopicType::String),
            "int64" | "int" => Ok(TopicType::Int64),
            "double" | "float" => Ok(TopicType::Double),
            _ => Err(format!("Unknown topic type: {s}")),
        }
    }
}

impl TopicType {
    /// Decode one raw record into a value of this type.
    ///
    /// Numeric types ignore surrounding whitespace.
    pub fn decode(&self, raw: &[u8]) -> Result<TopicValue, DecodeError> {
        let value = match self {
            TopicType::Binary => TopicValue::Binary(Bytes::copy_from_slice(raw)),
            TopicType::Json => TopicValue::Json(serde_json::from_slice(raw)?),
            TopicType::String => TopicValue::String(std::str::from_utf8(raw)?.to_string()),
            TopicType::Int64 => TopicValue::Int64(std::str::from_utf8(raw)?.trim().parse()?),
            TopicType::Double => TopicValue::Double(std::str::from_utf8(raw)?.trim().parse()?),
        };
        Ok(value)
    }
}

/// A decoded record, ready to be published.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicValue {
    Binary(Bytes),
    Json(serde_json::Value),
    String(String),
    Int64(i64),
    Double(f64),
}

impl TopicValue {
    pub fn topic_type(&self) -> TopicType {
        match self {
            TopicValue::Binary(_) => TopicType::Binary,
            TopicValue::Json(_) => TopicType::Json,
            TopicValue::String(_) => TopicType::String,
            TopicValue::Int64(_) => TopicType::Int64,
            TopicValue::Double(_) => TopicType::Double,
        }
    }

    /// Wire payload for brokers that carry opaque bytes.
    ///
    /// JSON is re-serialised compactly; numbers use their text form.
    pub fn to_payload(&self) -> Bytes {
        match self {
            TopicValue::Binary(bytes) => bytes.clone(),
            TopicValue::Json(json) => Bytes::from(json.to_string()),
            TopicValue::String(text) => Bytes::from(text.clone()),
            TopicValue::Int64(n) => Bytes::from(n.to_string()),
            TopicValue::Double(n) => Bytes::from(n.to_string()),
        }
    }
}
