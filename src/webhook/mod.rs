//! Shared pieces of the webhook normalization engine.
//!
//! Each driver owns its dispatch table and wire shapes; this module holds the
//! steps they all run in the same order:
//!
//! 1. [`read_body`] caps the payload at [`MAX_PAYLOAD_BYTES`]; callers that
//!    buffer the body themselves bound memory with [`read_capped`]
//! 2. the driver reads its discriminator ([`header`] or [`body_field`])
//! 3. [`signature::check`] verifies the raw bytes when a secret is resolved
//! 4. [`decode`] turns the bytes into the event's wire shape

pub mod signature;

#[cfg(test)]
mod signature_tests;

use std::io::{self, Read};

use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::ScmError;

/// Largest payload a driver will look at. Longer bodies are truncated.
pub const MAX_PAYLOAD_BYTES: usize = 10_000_000;

/// Returns at most [`MAX_PAYLOAD_BYTES`] of `body`.
#[must_use]
pub fn read_body(body: &[u8]) -> &[u8] {
    &body[..body.len().min(MAX_PAYLOAD_BYTES)]
}

/// Buffers at most [`MAX_PAYLOAD_BYTES`] from `reader`.
///
/// Bytes past the cap are never read, so memory stays bounded whatever the
/// sender declares.
///
/// # Errors
///
/// Returns any I/O error raised by `reader`.
pub fn read_capped<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(MAX_PAYLOAD_BYTES as u64).read_to_end(&mut body)?;
    Ok(body)
}

/// Returns a header value as trimmed text, or `None` if absent, empty or
/// not valid UTF-8.
#[must_use]
pub fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Reads a top-level string field from a JSON body without a typed decode.
///
/// Returns `None` if the body is not a JSON object or the field is missing
/// or not a string.
#[must_use]
pub fn body_field(data: &[u8], field: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(data).ok()?;
    value.get(field)?.as_str().map(ToOwned::to_owned)
}

/// Decodes the payload of a known event into its wire shape.
///
/// # Errors
///
/// Returns [`ScmError::Decode`] naming `event` if the body does not match.
pub fn decode<T: DeserializeOwned>(event: &str, data: &[u8]) -> Result<T, ScmError> {
    serde_json::from_slice(data).map_err(|e| ScmError::decode(event, e))
}
