use serde_json::Value;

/// A document that is not well-formed JSON, kept together with its raw bytes.
#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", String::from_utf8_lossy(.bytes))]
pub struct DecodeError {
    bytes: Vec<u8>,
    source: serde_json::Error,
}

impl DecodeError {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Decodes a whole document into a value tree.
///
/// Empty, truncated or trailing-garbage input is an error; nothing is
/// defaulted. Integer and float literals stay distinct in the tree.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError {
        bytes: bytes.to_vec(),
        source,
    })
}
