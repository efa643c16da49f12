use std::fmt;

use chrono::{DateTime, Utc};

/// Scalar value exchanged with a storage driver.
///
/// Outbound values produced by this crate are always `Null`, `Text`,
/// `Bytes` or, for record timestamps, `Timestamp`. Inbound values may be
/// anything a driver hands back; consumers reject what they cannot use.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    /// Absence of a value (SQL `NULL`)
    Null,
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// UTF-8 text
    Text(String),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl StorageValue {
    /// Returns a short name for the kind of value held.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageValue::Null => "null",
            StorageValue::Bytes(_) => "bytes",
            StorageValue::Text(_) => "text",
            StorageValue::Integer(_) => "integer",
            StorageValue::Float(_) => "float",
            StorageValue::Bool(_) => "bool",
            StorageValue::Timestamp(_) => "timestamp",
        }
    }

    /// Returns true for [`StorageValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, StorageValue::Null)
    }

    /// Returns the value as bytes when it is `Bytes` or `Text`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StorageValue::Bytes(bytes) => Some(bytes),
            StorageValue::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Display for StorageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageValue::Null => write!(f, "NULL"),
            StorageValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            StorageValue::Text(text) => write!(f, "{}", text),
            StorageValue::Integer(n) => write!(f, "{}", n),
            StorageValue::Float(n) => write!(f, "{}", n),
            StorageValue::Bool(b) => write!(f, "{}", b),
            StorageValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<String> for StorageValue {
    fn from(text: String) -> Self {
        StorageValue::Text(text)
    }
}

impl From<&str> for StorageValue {
    fn from(text: &str) -> Self {
        StorageValue::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(bytes: Vec<u8>) -> Self {
        StorageValue::Bytes(bytes)
    }
}

impl From<DateTime<Utc>> for StorageValue {
    fn from(ts: DateTime<Utc>) -> Self {
        StorageValue::Timestamp(ts)
    }
}

impl<T: Into<StorageValue>> From<Option<T>> for StorageValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StorageValue::Null, Into::into)
    }
}
