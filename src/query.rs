//! Mail search expression for a date window and a set of cards

use crate::error::{ExtractError, Result};
use crate::types::CardIdentity;
use chrono::NaiveDate;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build a Gmail search expression selecting notifications for any card
/// between `start_date` and `end_date`.
pub fn build_query(
    cards: &[CardIdentity],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<String> {
    if cards.is_empty() {
        return Err(ExtractError::Config(
            "no cards configured, cannot build a search query".into(),
        ));
    }
    if start_date > end_date {
        return Err(ExtractError::Config(format!(
            "search window starts after it ends ({start_date} > {end_date})"
        )));
    }

    let clauses: Vec<String> = cards.iter().flat_map(card_clauses).collect();
    if clauses.is_empty() {
        return Err(ExtractError::Config(
            "configured cards have no subject patterns".into(),
        ));
    }

    let query = format!(
        "(after:{} before:{}) AND {}",
        start_date.format(DATE_FORMAT),
        end_date.format(DATE_FORMAT),
        clauses.join(" OR ")
    );
    debug!(%query, "Built search query");

    Ok(query)
}

fn card_clauses(card: &CardIdentity) -> Vec<String> {
    let exclusions = if card.exclude_words.is_empty() {
        String::new()
    } else {
        format!(" -{{{}}}", card.exclude_words.join(","))
    };

    card.subject_patterns
        .iter()
        .map(|subject| {
            format!(
                "(from:{} subject:\"{subject}\"{exclusions})",
                card.from_email
            )
        })
        .collect()
}
