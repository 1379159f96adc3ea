use std::borrow::Cow;
use std::io::Read;

use hyper::body::Bytes;
use resty_shape::PartialMatch;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{ClientConfig, HarnessError};

/// A request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    /// Sent as-is.
    Raw(Bytes),
    /// Encoded as tab-indented JSON; needs a JSON content type.
    Json(Value),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HarnessError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, HarnessError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::Raw(buf.into()))
    }

    /// Bytes to send, or `None` for an empty request.
    pub(crate) fn encode(&self, config: &ClientConfig) -> Result<Option<Bytes>, HarnessError> {
        match self {
            Payload::Empty => Ok(None),
            Payload::Raw(bytes) => Ok(Some(bytes.clone())),
            Payload::Json(_) if !config.is_json() => {
                Err(HarnessError::UnsupportedPayload(config.content_type.clone()))
            }
            Payload::Json(value) => {
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(b"\t");
                let mut serializer = Serializer::with_formatter(&mut buf, formatter);
                value.serialize(&mut serializer)?;
                Ok(Some(buf.into()))
            }
        }
    }
}

impl From<&str> for Payload {
    fn from(body: &str) -> Self {
        Self::Raw(Bytes::copy_from_slice(body.as_bytes()))
    }
}

impl From<String> for Payload {
    fn from(body: String) -> Self {
        Self::Raw(body.into())
    }
}

impl From<&[u8]> for Payload {
    fn from(body: &[u8]) -> Self {
        Self::Raw(Bytes::copy_from_slice(body))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(body: Vec<u8>) -> Self {
        Self::Raw(body.into())
    }
}

impl From<Bytes> for Payload {
    fn from(body: Bytes) -> Self {
        Self::Raw(body)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// What a response body is compared against.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// A serialized JSON document, matched structurally.
    Bytes(Vec<u8>),
    /// A value, encoded to compact JSON and matched structurally.
    Json(Value),
    /// A literal fragment the raw body must contain.
    Partial(PartialMatch),
}

impl Expected {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HarnessError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, HarnessError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::Bytes(buf))
    }

    pub fn partial(literal: impl Into<PartialMatch>) -> Self {
        Self::Partial(literal.into())
    }

    /// Canonical bytes handed to the matcher.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, HarnessError> {
        match self {
            Expected::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Expected::Json(value) => Ok(Cow::Owned(serde_json::to_vec(value)?)),
            Expected::Partial(literal) => Ok(Cow::Borrowed(literal.as_bytes())),
        }
    }
}

impl From<&str> for Expected {
    fn from(document: &str) -> Self {
        Self::Bytes(document.as_bytes().to_vec())
    }
}

impl From<String> for Expected {
    fn from(document: String) -> Self {
        Self::Bytes(document.into_bytes())
    }
}

impl From<&[u8]> for Expected {
    fn from(document: &[u8]) -> Self {
        Self::Bytes(document.to_vec())
    }
}

impl From<Vec<u8>> for Expected {
    fn from(document: Vec<u8>) -> Self {
        Self::Bytes(document)
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<PartialMatch> for Expected {
    fn from(literal: PartialMatch) -> Self {
        Self::Partial(literal)
    }
}
