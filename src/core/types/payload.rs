//! `Payload` - The content carried by a signed envelope.
//!
//! A payload is either UTF-8 text or a JSON value. The variant is carried
//! on the wire as a single trailing type tag byte:
//!
//! | Variant | Tag | Encoding |
//! |---------|-----|----------|
//! | `Text`  | `s` | UTF-8 bytes |
//! | `Json`  | `j` | Compact JSON |

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::error::{EnvelopeError, EnvelopeResult};

/// Type tag for text payloads.
pub const TEXT_TAG: u8 = b's';

/// Type tag for JSON payloads.
pub const JSON_TAG: u8 = b'j';

/// The content of a signed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A UTF-8 string, signed as-is.
    Text(String),
    /// A structured value, signed as compact JSON.
    Json(Value),
}

impl Payload {
    /// Builds a JSON payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::PayloadEncode` if `value` cannot be
    /// represented as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> EnvelopeResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(EnvelopeError::PayloadEncode)
    }

    /// Returns the wire type tag for this payload.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Text(_) => TEXT_TAG,
            Self::Json(_) => JSON_TAG,
        }
    }

    /// Serializes the payload to the bytes that get signed.
    pub(crate) fn to_bytes(&self) -> EnvelopeResult<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.as_bytes().to_vec()),
            Self::Json(value) => serde_json::to_vec(value).map_err(EnvelopeError::PayloadEncode),
        }
    }

    /// Rebuilds a payload from verified bytes and their type tag.
    pub(crate) fn from_tagged_bytes(tag: u8, bytes: &[u8]) -> EnvelopeResult<Self> {
        match tag {
            TEXT_TAG => core::str::from_utf8(bytes)
                .map(|text| Self::Text(text.to_owned()))
                .map_err(|_| EnvelopeError::PayloadDecode),
            JSON_TAG => serde_json::from_slice(bytes)
                .map(Self::Json)
                .map_err(|_| EnvelopeError::PayloadDecode),
            _ => Err(EnvelopeError::MalformedEnvelope),
        }
    }

    /// Returns the text if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Returns the JSON value if this is a JSON payload.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Text(_) => None,
            Self::Json(value) => Some(value),
        }
    }

    /// Deserializes a JSON payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::PayloadDecode` for text payloads or when the
    /// JSON does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> EnvelopeResult<T> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|_| EnvelopeError::PayloadDecode)
            }
            Self::Text(_) => Err(EnvelopeError::PayloadDecode),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
