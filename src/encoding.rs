//! Base64 helpers for binary payloads crossing the JSON tool surface

use crate::error::Result;
use base64::Engine;

/// Encode bytes as standard, padded base64
pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode standard, padded base64. Surrounding whitespace is ignored.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let engine = base64::engine::general_purpose::STANDARD;
    Ok(engine.decode(text.trim())?)
}
