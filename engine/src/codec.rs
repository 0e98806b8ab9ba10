//! Serialization codec between in-memory collections and persisted text.
//!
//! Pure and stateless. Encoding always produces a complete string before
//! anything is written, so a persisted entry is either the old value or
//! the new one, never a torn write.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Serialize a collection to its persisted textual form.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Codec(e.to_string()))
}

/// Parse persisted text into a JSON value for shape validation.
///
/// Returns `None` when the text is not JSON at all; callers treat that
/// the same as a completely unparsable shape.
pub fn parse(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}
