//! Core types for cards, messages and transactions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configured identity of one payment instrument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardIdentity {
    /// Display name of the card or account (e.g., "Millennia Credit")
    pub instrument_name: String,

    /// Issuing bank
    pub bank_name: String,

    /// Last four digits used to recognize the card in message text
    pub last4: String,

    /// Sender address the bank notifications come from
    pub from_email: String,

    /// Subject alternatives, any of which selects a notification
    pub subject_patterns: Vec<String>,

    /// Words that disqualify a message from the search
    pub exclude_words: Vec<String>,
}

/// Mail provider message ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference returned by a mail search, resolved by a later fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub id: MessageId,

    /// Source-specific locator (file path, API resource name, ...)
    pub locator: String,
}

/// What a MIME part carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// Transfer-encoded payload (URL-safe base64, padding optional)
    Body(String),

    /// Nested parts in original order
    Children(Vec<MessagePart>),

    /// Neither a payload nor children (attachment stubs, malformed parts)
    Empty,
}

/// One node of a message's MIME tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePart {
    pub mime_type: String,
    pub content: PartContent,
}

impl MessagePart {
    /// Build a part from loosely shaped provider data.
    ///
    /// A non-empty body makes the part a leaf and any children are dropped;
    /// otherwise non-empty children make it a container.
    pub fn new(
        mime_type: impl Into<String>,
        body: Option<String>,
        children: Vec<Self>,
    ) -> Self {
        let content = match body {
            Some(data) if !data.is_empty() => PartContent::Body(data),
            _ if !children.is_empty() => PartContent::Children(children),
            _ => PartContent::Empty,
        };

        Self {
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn leaf(mime_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(mime_type, Some(body.into()), Vec::new())
    }

    pub fn container(mime_type: impl Into<String>, children: Vec<Self>) -> Self {
        Self::new(mime_type, None, children)
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match &self.content {
            PartContent::Body(data) => Some(data),
            _ => None,
        }
    }

    /// Child parts; empty for leaves
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.content {
            PartContent::Children(children) => children,
            _ => &[],
        }
    }
}

/// A fetched message: headers plus its MIME tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,

    /// Headers as (name, value) pairs in original order
    pub headers: Vec<(String, String)>,

    pub payload: MessagePart,
}

impl Message {
    /// Value of the first header whose name matches exactly
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `Date` header, or an empty string when absent
    #[must_use]
    pub fn date(&self) -> &str {
        self.header("Date").unwrap_or_default()
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.payload.mime_type
    }
}

/// A card transaction recognized in a notification email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub id: String,

    /// Date header as sent
    pub date: String,

    /// Filled by a field extractor, empty otherwise
    pub amount: String,

    /// Filled by a field extractor, empty otherwise
    pub recipient: String,

    /// Cleaned message text the card was found in
    pub body: String,

    pub instrument_name: String,
    pub bank_name: String,
    pub last4: String,

    /// Top-level MIME type of the source message
    pub mime_type: String,
}
