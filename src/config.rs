//! Card configuration loaded from CSV

use crate::error::{ExtractError, Result};
use crate::types::CardIdentity;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Separator for list-valued cells (`subject`, `exclude_words`)
const LIST_SEPARATOR: char = '|';

/// One row of the card configuration file
#[derive(Debug, Clone, Deserialize)]
struct CardRow {
    instrument_name: String,
    bank_name: String,
    last4: String,
    from_email: String,
    subject: String,
    #[serde(default)]
    exclude_words: String,
}

impl CardRow {
    fn into_identity(self, line: usize) -> Result<CardIdentity> {
        let last4 = self.last4.trim().to_string();
        if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(ExtractError::Config(format!(
                "row {line}: last4 must be exactly four digits, got {:?}",
                self.last4
            )));
        }

        let from_email = self.from_email.trim().to_string();
        if from_email.is_empty() {
            return Err(ExtractError::Config(format!("row {line}: from_email is empty")));
        }

        let subject_patterns = split_list(&self.subject);
        if subject_patterns.is_empty() {
            return Err(ExtractError::Config(format!("row {line}: subject is empty")));
        }

        Ok(CardIdentity {
            instrument_name: self.instrument_name.trim().to_string(),
            bank_name: self.bank_name.trim().to_string(),
            last4,
            from_email,
            subject_patterns,
            exclude_words: split_list(&self.exclude_words),
        })
    }
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load and validate cards from a CSV file
pub fn load_cards(path: &Path) -> Result<Vec<CardIdentity>> {
    let file = std::fs::File::open(path).map_err(|e| {
        ExtractError::Config(format!("cannot open {}: {e}", path.display()))
    })?;
    let cards = load_cards_from_reader(file)?;
    info!(path = %path.display(), cards = cards.len(), "Loaded card configuration");
    Ok(cards)
}

/// Load and validate cards from CSV data with a header row
pub fn load_cards_from_reader<R: Read>(reader: R) -> Result<Vec<CardIdentity>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let mut cards = Vec::new();
    for (index, row) in rdr.deserialize::<CardRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = row.map_err(|e| ExtractError::Config(format!("row {line}: {e}")))?;
        let card = row.into_identity(line)?;
        debug!(last4 = %card.last4, bank = %card.bank_name, "Card configured");
        cards.push(card);
    }

    if cards.is_empty() {
        return Err(ExtractError::Config("card configuration has no rows".into()));
    }

    Ok(cards)
}
