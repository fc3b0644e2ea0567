// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Bank Notification Extractor
//!
//! Turns card alert emails into transaction records. Messages are reduced to
//! a single plain-text body whatever their MIME structure, then matched
//! against the last four digits of configured cards.
//!
//! # Pipeline
//!
//! - [`build_query`] composes a date-bounded search for every card
//! - a [`MailSource`] searches and fetches the messages
//! - [`parse_message`] picks a strategy from the top-level MIME type and
//!   walks the part tree down to text, stripping links
//! - [`match_transactions`] emits one [`Transaction`] per matching card
//! - an optional [`FieldExtractor`] fills amount and recipient
//!
//! # Example
//!
//! ```rust
//! use bank_mail_extract::{Message, MessageId, MessagePart, ParsedMessage, parse_message};
//!
//! let message = Message {
//!     id: MessageId::new("18c2"),
//!     headers: vec![("Date".into(), "Sun, 28 Sep 2025 21:01:28 +0530".into())],
//!     // "Card ending 0919" in URL-safe base64
//!     payload: MessagePart::leaf("text/plain", "Q2FyZCBlbmRpbmcgMDkxOQ"),
//! };
//!
//! let parsed = parse_message(&message).unwrap();
//! assert_eq!(parsed, ParsedMessage::Content("Card ending 0919".into()));
//! ```

mod config;
mod decode;
mod error;
mod extracted;
mod matcher;
mod parser;
mod pipeline;
mod query;
mod source;
mod types;
mod walker;

pub use config::{load_cards, load_cards_from_reader};
pub use decode::{decode, decode_part, encode, to_plain_text};
pub use error::{ExtractError, Result};
pub use extracted::*;
pub use matcher::{match_message, match_transactions};
pub use parser::{MimeStrategy, ParsedMessage, clean_content, extract_content, parse_message};
pub use pipeline::{
    RunContext, RunReport, fetch_messages, run, save_transactions, write_transactions,
};
pub use query::build_query;
pub use source::{
    DirectorySource, GmailBody, GmailHeader, GmailMessage, GmailPart, MailSource, parse_eml,
    parse_gmail_json,
};
pub use types::*;
pub use walker::{extract_all_text, find_first_by_type};
