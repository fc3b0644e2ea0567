//! Matching cleaned message text against configured cards

use crate::types::{CardIdentity, Message, Transaction};
use tracing::info;

/// One transaction per card whose last four digits occur in `content`.
///
/// Containment is a plain case-sensitive substring test, so digits inside a
/// longer number also match. Output follows the order of `cards`; cards that
/// share a last4 each produce their own transaction.
#[must_use]
pub fn match_transactions(
    id: &str,
    date: &str,
    mime_type: &str,
    content: &str,
    cards: &[CardIdentity],
) -> Vec<Transaction> {
    cards
        .iter()
        .filter(|card| content.contains(card.last4.as_str()))
        .map(|card| {
            info!(
                message_id = id,
                last4 = %card.last4,
                instrument = %card.instrument_name,
                "Transaction found"
            );
            Transaction {
                id: id.to_string(),
                date: date.to_string(),
                amount: String::new(),
                recipient: String::new(),
                body: content.to_string(),
                instrument_name: card.instrument_name.clone(),
                bank_name: card.bank_name.clone(),
                last4: card.last4.clone(),
                mime_type: mime_type.to_string(),
            }
        })
        .collect()
}

/// `match_transactions` using the id, date and type of a fetched message
#[must_use]
pub fn match_message(message: &Message, content: &str, cards: &[CardIdentity]) -> Vec<Transaction> {
    match_transactions(
        message.id.as_str(),
        message.date(),
        message.mime_type(),
        content,
        cards,
    )
}
