//! Transfer decoding and text conversion for single MIME parts

use crate::error::{ExtractError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Column width handed to the HTML renderer; wide enough that bank
/// notifications are never re-wrapped.
const HTML_TEXT_WIDTH: usize = 10_000;

/// Decode a URL-safe base64 payload, reinstating missing padding.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let mut normalized = encoded.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    STANDARD
        .decode(normalized.as_bytes())
        .map_err(|e| ExtractError::Decode(e.to_string()))
}

/// Interpret decoded bytes as text, rendering HTML when the part declares it.
pub fn to_plain_text(raw: &[u8], declared_mime_type: &str) -> Result<String> {
    if declared_mime_type.starts_with("text/html") {
        // Links render as their text only: no bracket markup, no footnotes.
        return html2text::config::plain_no_decorate()
            .link_footnotes(false)
            .string_from_read(raw, HTML_TEXT_WIDTH)
            .map_err(|e| ExtractError::Decode(format!("HTML conversion: {e}")));
    }

    Ok(String::from_utf8_lossy(raw).into_owned())
}

/// `decode` followed by `to_plain_text`
pub fn decode_part(encoded: &str, mime_type: &str) -> Result<String> {
    let raw = decode(encoded)?;
    to_plain_text(&raw, mime_type)
}

/// Encode bytes the way providers ship part bodies (URL-safe, unpadded).
#[must_use]
pub fn encode(raw: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}
