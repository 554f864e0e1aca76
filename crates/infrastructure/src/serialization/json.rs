//! Account file JSON encoding.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for account file encoding.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The value could not be written as JSON.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The bytes are not JSON of the expected shape.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Serializes a value as pretty JSON with 2-space indentation and a
/// trailing newline. Field order follows the type's declaration order.
///
/// # Errors
///
/// Returns `Serialize` if the value cannot be represented as JSON.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    value.serialize(&mut serializer).map_err(SerializationError::Serialize)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Deserializes JSON bytes, pretty or minified.
///
/// # Errors
///
/// Returns `Deserialize` if the JSON is invalid or does not match `T`.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}
