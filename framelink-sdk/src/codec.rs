//! Value codec for the plugin/host boundary.
//!
//! Everything that crosses the channel travels as a string: field values
//! are encoded directly, broadcaster and plugin messages use the
//! `[event, ...args]` framing. The encoding is JSON text — deterministic,
//! and round-trips any JSON-representable value.

use crate::error::{DecodeError, SdkResult};
use serde_json::Value;

/// Encodes a value into transportable text.
pub fn encode(value: &Value) -> SdkResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes transportable text back into a value.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(text).map_err(DecodeError::Malformed)
}

/// Encodes a tagged `[event, ...args]` message.
pub fn encode_message(event: &str, args: &[Value]) -> SdkResult<String> {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(Value::String(event.to_owned()));
    items.extend_from_slice(args);
    encode(&Value::Array(items))
}

/// Decodes a tagged `[event, ...args]` message.
///
/// Fails with [`DecodeError::NotAMessage`] when the payload is not an
/// array or its first element is not a string. Callers at inbound
/// delivery points drop the message on failure rather than propagate.
pub fn decode_message(text: &str) -> Result<(String, Vec<Value>), DecodeError> {
    let Value::Array(items) = decode(text)? else {
        return Err(DecodeError::NotAMessage);
    };

    let mut items = items.into_iter();
    match items.next() {
        Some(Value::String(event)) => Ok((event, items.collect())),
        _ => Err(DecodeError::NotAMessage),
    }
}
