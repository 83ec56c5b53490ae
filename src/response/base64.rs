//! Base64 encoding and decoding utilities

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::Result;

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode base64 string to binary data
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    // Handle data URL format (e.g., "data:image/png;base64,...")
    let data = if encoded.contains(',') {
        encoded.split(',').last().unwrap_or(encoded)
    } else {
        encoded
    };

    Ok(STANDARD.decode(data.trim())?)
}
