//! Structured field extraction from notification bodies
//!
//! Amount, currency and recipient are not derived by the matcher. They come
//! from a [`FieldExtractor`]: normally an LLM call following
//! [`EXTRACTION_POLICY`], or the offline [`CueFieldExtractor`].

use crate::error::Result;
use crate::types::Transaction;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Instructions given to an LLM-backed extractor along with the body text
pub const EXTRACTION_POLICY: &str = "\
You receive only the email body as plain text (no headers or subject).
Extract the primary payment/transfer amount, its currency and the recipient name.
Return exactly one JSON object: {\"amount\": number|null, \"currency\": string|null, \"recipient\": string|null}.
- amount: numeric, without thousands separators (\"$1,299.00\" -> 1299.0); null if ambiguous or absent.
- currency: 3-letter ISO code if present, otherwise inferred from symbols ($, EUR, INR, GBP); null if unsure.
- recipient: the person or entity receiving money (payee, beneficiary, merchant); original casing; null if unknown.
- With several amounts prefer the one near cues like \"total\", \"paid\", \"amount due\", \"transfer\", \"credited\", \"sent\".
- If the body is not about a payment or transfer, return all three fields as null.";

/// Fields extracted from one notification body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub recipient: Option<String>,
}

impl ExtractedFields {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.currency.is_none() && self.recipient.is_none()
    }

    /// Amount as stored on a transaction: `"<CUR> <value>"`, or the bare value
    #[must_use]
    pub fn amount_display(&self) -> String {
        match (self.amount, &self.currency) {
            (Some(value), Some(currency)) => format!("{currency} {value:.2}"),
            (Some(value), None) => format!("{value:.2}"),
            (None, _) => String::new(),
        }
    }
}

/// Extracts amount, currency and recipient from plain-text bodies
pub trait FieldExtractor {
    fn extract(&self, body: &str) -> Result<ExtractedFields>;
}

/// Fill `amount` and `recipient` of each transaction from its body.
///
/// Extractor failures are logged and leave the fields empty.
pub fn enrich_transactions(transactions: &mut [Transaction], extractor: &dyn FieldExtractor) {
    for txn in transactions.iter_mut() {
        match extractor.extract(&txn.body) {
            Ok(fields) => {
                debug!(message_id = %txn.id, ?fields, "Extracted fields");
                txn.amount = fields.amount_display();
                txn.recipient = fields.recipient.unwrap_or_default();
            }
            Err(e) => {
                warn!(message_id = %txn.id, error = %e, "Field extraction failed");
            }
        }
    }
}

// Regex patterns
static AMOUNT_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<pre>\b(?:INR|USD|EUR|GBP|Rs\.?)|₹|\$|€|£)\s*(?P<value>\d[\d,]*(?:\.\d{1,2})?)|(?P<value2>\d[\d,]*(?:\.\d{1,2})?)\s*(?P<post>INR|USD|EUR|GBP)\b",
    )
    .unwrap()
});

static CUE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\b(total|paid|amount due|amount|transfer(?:red)?|credited|debited|charged|sent|spent|for)\b")
        .unwrap()
});

static RECIPIENT_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"\b(?:at|to|towards)\s+(?P<name>[A-Z][\w&@.'-]*(?:\s+[A-Z][\w&@.'-]*)*)",
    )
    .unwrap()
});

/// Maximum distance in bytes between a cue word and the amount it qualifies
const CUE_WINDOW: usize = 24;

/// Offline extractor based on currency patterns and nearby cue words
#[derive(Debug, Clone, Copy, Default)]
pub struct CueFieldExtractor;

impl FieldExtractor for CueFieldExtractor {
    fn extract(&self, body: &str) -> Result<ExtractedFields> {
        let candidates: Vec<(usize, f64, String)> = AMOUNT_REGEX
            .captures_iter(body)
            .filter_map(|cap| {
                let start = cap.get(0)?.start();
                let (value, currency) = match (cap.name("value"), cap.name("value2")) {
                    (Some(v), _) => (v.as_str(), cap.name("pre")?.as_str()),
                    (None, Some(v)) => (v.as_str(), cap.name("post")?.as_str()),
                    (None, None) => return None,
                };
                let value: f64 = value.replace(',', "").parse().ok()?;
                Some((start, value, normalize_currency(currency).to_string()))
            })
            .collect();

        let cued = candidates.iter().find(|(start, _, _)| {
            CUE_REGEX
                .find_iter(body)
                .any(|cue| cue.end() <= *start && start - cue.end() <= CUE_WINDOW)
        });
        // An amount with no cue in front of it is ambiguous: leave it null.
        let (amount, currency) = cued.map_or((None, None), |(_, amount, currency)| {
            (Some(*amount), Some(currency.clone()))
        });

        let recipient = RECIPIENT_REGEX
            .captures(body)
            .and_then(|cap| cap.name("name"))
            .map(|m| trim_recipient(m.as_str()))
            .filter(|name| !name.is_empty());

        Ok(ExtractedFields {
            amount,
            currency,
            recipient,
        })
    }
}

fn normalize_currency(raw: &str) -> &'static str {
    match raw.to_ascii_uppercase().trim_end_matches('.') {
        "INR" | "RS" | "₹" => "INR",
        "EUR" | "€" => "EUR",
        "GBP" | "£" => "GBP",
        _ => "USD",
    }
}

/// Drop trailing connector words the name pattern swallows ("Limited Is")
fn trim_recipient(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while let Some(last) = words.last() {
        if matches!(*last, "Is" | "On" | "For" | "Has" | "Was" | "Via") {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ").trim_end_matches('.').to_string()
}
