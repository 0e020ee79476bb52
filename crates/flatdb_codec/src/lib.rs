//! # flatdb Codec
//!
//! Pretty-printed JSON encoding/decoding for flatdb records.
//!
//! This crate defines the byte-exact on-disk format of a record:
//! indented, human-readable JSON terminated by a single trailing
//! newline. Editing a record with a text editor and reading it back
//! is a supported workflow, so readability wins over compactness.
//!
//! The codec is shape-agnostic: anything that implements serde's
//! `Serialize`/`DeserializeOwned` can be stored, and callers that want
//! no schema at all can round-trip through [`serde_json::Value`].
//!
//! ## Usage
//!
//! ```
//! use flatdb_codec::{to_pretty_json, from_json};
//!
//! let value = serde_json::json!({ "name": "Alice", "age": 30 });
//! let bytes = to_pretty_json(&value).unwrap();
//! assert!(bytes.ends_with(b"\n"));
//!
//! let decoded: serde_json::Value = from_json(&bytes).unwrap();
//! assert_eq!(value, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;

pub use error::{CodecError, CodecResult};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a value as pretty-printed JSON with a trailing newline.
///
/// The output is deterministic for a given value and always ends in
/// exactly one `\n` byte.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if the value cannot be
/// represented as JSON (for example a map with non-string keys).
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes a value previously produced by [`to_pretty_json`].
///
/// Trailing whitespace, including the terminating newline, is accepted.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the bytes are not valid
/// JSON or do not match the target shape.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
}
