use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TokenError;

/// Turns caller values into payload bytes and back.
pub trait PayloadSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, TokenError>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, TokenError>;
}

/// Compact JSON, fields in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl PayloadSerializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, TokenError> {
        serde_json::to_vec(value).map_err(|e| TokenError::Serialization {
            reason: e.to_string(),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, TokenError> {
        serde_json::from_slice(bytes)
            .map_err(|e| TokenError::corrupt_payload(format!("json: {e}")))
    }
}
