//! MIME-type dispatch: reduce a whole message to one cleaned plain-text body

use crate::decode::{decode, decode_part};
use crate::error::Result;
use crate::types::{Message, MessagePart};
use crate::walker::{extract_all_text, find_first_by_type};
use regex::Regex;
use tracing::debug;

static LINK_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(https?://\S+|www\.\S+)").unwrap());

/// Extraction strategy chosen from a message's top-level type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeStrategy {
    PlainText,
    Html,
    Alternative,
    Mixed,
}

impl MimeStrategy {
    /// Strategy for a top-level MIME type, `None` when it is not interpretable
    #[must_use]
    pub fn for_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            "text/plain" => Some(Self::PlainText),
            "text/html" => Some(Self::Html),
            "multipart/alternative" => Some(Self::Alternative),
            "multipart/mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// Outcome of parsing one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    /// Cleaned, non-empty text
    Content(String),

    /// Interpretable, but nothing left after cleaning
    NoContent,

    /// Top-level type has no extraction strategy
    Unsupported(String),
}

/// Parse a message into its cleaned text body
pub fn parse_message(message: &Message) -> Result<ParsedMessage> {
    let mime_type = message.mime_type();
    let Some(strategy) = MimeStrategy::for_mime_type(mime_type) else {
        return Ok(ParsedMessage::Unsupported(mime_type.to_string()));
    };

    let content = clean_content(&extract_content(strategy, &message.payload)?);
    debug!(message_id = %message.id, mime_type, chars = content.len(), "Parsed message");

    if content.is_empty() {
        Ok(ParsedMessage::NoContent)
    } else {
        Ok(ParsedMessage::Content(content))
    }
}

/// Raw (uncleaned) text of a payload under the given strategy
pub fn extract_content(strategy: MimeStrategy, payload: &MessagePart) -> Result<String> {
    match strategy {
        MimeStrategy::PlainText => parse_text_plain(payload),
        MimeStrategy::Html => parse_text_html(payload),
        MimeStrategy::Alternative => parse_multipart_alternative(payload),
        MimeStrategy::Mixed => parse_multipart_mixed(payload),
    }
}

/// Strip links, then surrounding whitespace
#[must_use]
pub fn clean_content(content: &str) -> String {
    LINK_REGEX.replace_all(content, "").trim().to_string()
}

fn parse_text_plain(payload: &MessagePart) -> Result<String> {
    // Declared type wins: bytes are taken verbatim even if they look like HTML.
    match payload.body() {
        Some(data) => Ok(String::from_utf8_lossy(&decode(data)?).into_owned()),
        None => Ok(String::new()),
    }
}

fn parse_text_html(payload: &MessagePart) -> Result<String> {
    match payload.body() {
        Some(data) => decode_part(data, "text/html"),
        None => Ok(String::new()),
    }
}

fn parse_multipart_alternative(payload: &MessagePart) -> Result<String> {
    let parts = payload.children();

    if let Some(text_part) = find_first_by_type(parts, "text/plain") {
        return extract_all_text(Some(text_part));
    }

    if let Some(html_part) = find_first_by_type(parts, "text/html") {
        return extract_all_text(Some(html_part));
    }

    debug!("multipart/alternative without text parts, using first child");
    extract_all_text(parts.first())
}

fn parse_multipart_mixed(payload: &MessagePart) -> Result<String> {
    let parts = payload.children();
    let mut content = String::new();

    for part in parts.iter().filter(|p| p.mime_type.starts_with("text/")) {
        content.push_str(&extract_all_text(Some(part))?);
    }

    if content.is_empty() {
        for part in parts {
            let part_content = extract_all_text(Some(part))?;
            if !part_content.is_empty() {
                content.push_str(&part_content);
                break;
            }
        }
    }

    Ok(content)
}
