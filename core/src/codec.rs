//! Value encoding for the store.
//!
//! # Design
//! Values are double encoded: serialized to JSON text, and that text is sent
//! as a JSON string. The backend keeps the string verbatim, so the text that
//! comes back is exactly what serde produced, `1.0` stays a float and `1`
//! stays an integer. The static type passed to `decode` picks the shape
//! (tuple, sequence, map, struct) the text is read into.
//!
//! Values written by other clients as plain JSON (not wrapped in a string)
//! are decoded directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};

/// Encode `value` into the JSON string body sent on `save`.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let text = serde_json::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))?;
    serde_json::to_string(&text).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Decode the `result` field of a `get` response.
pub fn decode<T: DeserializeOwned>(result: Value) -> Result<T> {
    match result {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            // Not JSON text at all: a bare string written by another client.
            Err(_) if serde_json::from_str::<Value>(&text).is_err() => {
                serde_json::from_value(Value::String(text))
                    .map_err(|e| StoreError::Decode(e.to_string()))
            }
            Err(err) => Err(StoreError::Decode(err.to_string())),
        },
        other => serde_json::from_value(other).map_err(|e| StoreError::Decode(e.to_string())),
    }
}
