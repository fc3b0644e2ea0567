//! Mail sources: where raw messages come from
//!
//! A [`MailSource`] answers a search with message handles and resolves each
//! handle to a full [`Message`]. [`DirectorySource`] reads exported messages
//! from disk, either Gmail API JSON (`format=full`) or RFC 5322 `.eml` files.

use crate::decode::encode;
use crate::error::{ExtractError, Result};
use crate::types::{Message, MessageHandle, MessageId, MessagePart};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Search and retrieval transport for one mail account
pub trait MailSource {
    /// Handles of all messages matching a Gmail search expression, in result order
    fn search(&mut self, query: &str) -> Result<Vec<MessageHandle>>;

    /// Full MIME tree and headers for one handle
    fn fetch(&mut self, handle: &MessageHandle) -> Result<Message>;
}

/// Gmail API `users.messages` resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    pub payload: Option<GmailPart>,
}

/// Gmail API `MessagePart`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailPart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<GmailHeader>,
    #[serde(default)]
    pub body: Option<GmailBody>,
    #[serde(default)]
    pub parts: Vec<Self>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailHeader {
    pub name: String,
    pub value: String,
}

/// Gmail API `MessagePartBody`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailBody {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attachment_id: Option<String>,
}

impl From<GmailPart> for MessagePart {
    fn from(part: GmailPart) -> Self {
        let body = part.body.and_then(|b| b.data);
        let children = part.parts.into_iter().map(Self::from).collect();
        Self::new(part.mime_type, body, children)
    }
}

impl From<GmailMessage> for Message {
    fn from(message: GmailMessage) -> Self {
        let payload = message.payload.unwrap_or_default();
        let headers = payload
            .headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect();

        Self {
            id: MessageId::new(message.id),
            headers,
            payload: payload.into(),
        }
    }
}

/// Parse a Gmail API JSON message
pub fn parse_gmail_json(json: &str) -> Result<Message> {
    let message: GmailMessage = serde_json::from_str(json)?;
    Ok(message.into())
}

/// Parse an RFC 5322 message into the same part tree a provider would return.
///
/// Leaf bodies are transfer-decoded by `mailparse` and re-encoded as URL-safe
/// base64, so they go through the regular decoder downstream.
pub fn parse_eml(fallback_id: &str, raw: &[u8]) -> Result<Message> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ExtractError::Fetch {
        target: fallback_id.to_string(),
        details: e.to_string(),
    })?;

    let headers: Vec<(String, String)> = parsed
        .headers
        .iter()
        .map(|h| (h.get_key(), h.get_value()))
        .collect();

    let id = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("message-id"))
        .map_or_else(
            || fallback_id.to_string(),
            |(_, value)| value.trim().trim_matches(['<', '>']).to_string(),
        );

    Ok(Message {
        id: MessageId::new(id),
        headers,
        payload: convert_parsed_part(&parsed, fallback_id)?,
    })
}

fn convert_parsed_part(part: &mailparse::ParsedMail, id: &str) -> Result<MessagePart> {
    let mime_type = part.ctype.mimetype.to_lowercase();

    if !part.subparts.is_empty() {
        let children = part
            .subparts
            .iter()
            .map(|p| convert_parsed_part(p, id))
            .collect::<Result<Vec<_>>>()?;
        return Ok(MessagePart::container(mime_type, children));
    }

    let to_fetch_error = |e: mailparse::MailParseError| ExtractError::Fetch {
        target: id.to_string(),
        details: e.to_string(),
    };
    // Text parts are charset-decoded to UTF-8; everything else stays raw.
    let raw = if mime_type.starts_with("text/") {
        part.get_body().map_err(to_fetch_error)?.into_bytes()
    } else {
        part.get_body_raw().map_err(to_fetch_error)?
    };

    Ok(MessagePart::new(mime_type, Some(encode(&raw)), Vec::new()))
}

/// Exported messages in a local directory.
///
/// The search query is not evaluated: every `*.json` and `*.eml` file is a
/// hit, ordered by file name.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MailSource for DirectorySource {
    fn search(&mut self, query: &str) -> Result<Vec<MessageHandle>> {
        info!(root = %self.root.display(), %query, "Listing exported messages");

        let entries = std::fs::read_dir(&self.root).map_err(|e| ExtractError::Fetch {
            target: self.root.display().to_string(),
            details: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && MessageFormat::from_path(path).is_some())
            .collect();
        paths.sort();

        let handles: Vec<MessageHandle> = paths
            .into_iter()
            .map(|path| MessageHandle {
                id: MessageId::new(
                    path.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                ),
                locator: path.display().to_string(),
            })
            .collect();

        debug!(count = handles.len(), "Search complete");
        Ok(handles)
    }

    fn fetch(&mut self, handle: &MessageHandle) -> Result<Message> {
        let path = Path::new(&handle.locator);
        let to_fetch_error = |details: String| ExtractError::Fetch {
            target: handle.locator.clone(),
            details,
        };

        let raw = std::fs::read(path).map_err(|e| to_fetch_error(e.to_string()))?;

        match MessageFormat::from_path(path) {
            Some(MessageFormat::GmailJson) => {
                let json = String::from_utf8(raw).map_err(|e| to_fetch_error(e.to_string()))?;
                parse_gmail_json(&json).map_err(|e| to_fetch_error(e.to_string()))
            }
            Some(MessageFormat::Eml) => parse_eml(handle.id.as_str(), &raw),
            None => Err(to_fetch_error("unsupported file type".into())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageFormat {
    GmailJson,
    Eml,
}

impl MessageFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::GmailJson),
            "eml" => Some(Self::Eml),
            _ => None,
        }
    }
}
