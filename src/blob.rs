//! Opaque JSON snapshot carried by a change record.
//!
//! A [`Blob`] is a pass-through carrier: it stores whatever bytes produced
//! it and hands them back unchanged to the storage driver and to JSON
//! encoders. Structure is never validated on the way in; whoever produced
//! the bytes is responsible for them being JSON.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{Error, StorageValue};

/// The JSON `null` literal.
pub const NULL_LITERAL: &[u8] = b"null";

/// Serialized snapshot of an object, stored as raw bytes understood to be
/// JSON.
///
/// An empty blob and a blob holding exactly `null` are both in the null
/// state (see [`is_null`](Blob::is_null)). Equality is exact byte equality,
/// so those two are null but not equal to each other.
///
/// # Examples
///
/// ```
/// use loggable::{Blob, StorageValue};
///
/// let blob = Blob::new(r#"{"name":"Alice"}"#);
/// assert!(!blob.is_null());
///
/// let stored = blob.to_storage_value().unwrap();
/// assert_eq!(stored, StorageValue::Text(r#"{"name":"Alice"}"#.to_string()));
///
/// assert!(Blob::default().is_null());
/// assert_eq!(Blob::default().to_storage_value().unwrap(), StorageValue::Null);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    /// Creates a blob holding `bytes` verbatim.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Serializes `value` to JSON and wraps the result.
    pub fn snapshot<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self::new(serde_json::to_vec(value)?))
    }

    /// Decodes the stored JSON into `T`.
    ///
    /// A blob in the null state decodes as JSON `null`, so decoding into an
    /// `Option` yields `None`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let source: &[u8] = if self.is_null() {
            NULL_LITERAL
        } else {
            &self.bytes
        };
        Ok(serde_json::from_slice(source)?)
    }

    /// Returns the stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the number of stored bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if no bytes are stored.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns true if the blob is empty or holds exactly `null`.
    pub fn is_null(&self) -> bool {
        self.bytes.is_empty() || self.bytes == NULL_LITERAL
    }

    /// Exact byte-sequence comparison.
    pub fn equals(&self, other: &Blob) -> bool {
        self.bytes == other.bytes
    }

    /// Converts the blob into a value for the storage driver.
    ///
    /// Null-state blobs become [`StorageValue::Null`]. Anything else is
    /// handed over as text, or as bytes when it is not valid UTF-8.
    pub fn to_storage_value(&self) -> Result<StorageValue, Error> {
        if self.is_null() {
            return Ok(StorageValue::Null);
        }

        Ok(match std::str::from_utf8(&self.bytes) {
            Ok(text) => StorageValue::Text(text.to_owned()),
            Err(_) => StorageValue::Bytes(self.bytes.clone()),
        })
    }

    /// Loads the blob from a value scanned out of storage.
    ///
    /// `Null` clears the blob and `Bytes` replaces its contents. Any other
    /// kind is rejected with [`Error::TypeMismatch`] and the blob is left
    /// unchanged.
    pub fn scan_storage_value(&mut self, value: StorageValue) -> Result<(), Error> {
        match value {
            StorageValue::Null => {
                self.bytes.clear();
                Ok(())
            }
            StorageValue::Bytes(bytes) => {
                self.bytes = bytes;
                Ok(())
            }
            other => Err(Error::TypeMismatch {
                found: other.kind(),
            }),
        }
    }

    /// Returns the JSON encoding of the blob: its bytes, unmodified.
    ///
    /// An empty blob encodes as `null`.
    pub fn to_json(&self) -> Vec<u8> {
        if self.bytes.is_empty() {
            NULL_LITERAL.to_vec()
        } else {
            self.bytes.clone()
        }
    }

    /// Replaces the stored bytes with `data` verbatim, without parsing it.
    pub fn load_json(&mut self, data: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(data);
    }
}

/// JSON-encodes a possibly absent blob; `None` encodes as `null`.
pub fn marshal_json(blob: Option<&Blob>) -> Vec<u8> {
    blob.map_or_else(|| NULL_LITERAL.to_vec(), Blob::to_json)
}

/// Stores `data` into `target` verbatim.
///
/// Fails with [`Error::NilTarget`] when there is no blob to store into.
pub fn unmarshal_json(target: Option<&mut Blob>, data: &[u8]) -> Result<(), Error> {
    let blob = target.ok_or(Error::NilTarget)?;
    blob.load_json(data);
    Ok(())
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({})", String::from_utf8_lossy(&self.bytes))
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for Blob {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Blob {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl TryFrom<StorageValue> for Blob {
    type Error = Error;

    fn try_from(value: StorageValue) -> Result<Self, Self::Error> {
        let mut blob = Blob::default();
        blob.scan_storage_value(value)?;
        Ok(blob)
    }
}

impl Serialize for Blob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as _;

        if self.is_null() {
            return serializer.serialize_none();
        }

        let text = std::str::from_utf8(&self.bytes).map_err(S::Error::custom)?;
        let raw = RawValue::from_string(text.to_owned()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Blob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Blob::new(raw.get()))
    }
}
