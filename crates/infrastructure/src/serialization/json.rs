//! JSON serialization helpers for files written to disk.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Serializes a value to pretty JSON bytes.
///
/// Output uses 2-space indentation and ends with a newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortuna_domain::Credentials;

    #[test]
    fn test_output_is_indented_with_trailing_newline() {
        let bytes = to_json_stable_bytes(&Credentials::new("a", "r")).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf-8");

        assert!(text.ends_with("}\n"));
        assert!(text.contains("  \"accessToken\": \"a\""));
    }

    #[test]
    fn test_invalid_json_is_a_deserialize_error() {
        let result = from_json_bytes::<Credentials>(b"{\"accessToken\": 1}");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
