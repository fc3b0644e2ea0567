//! One extraction run: search, fetch, parse, match, persist

use crate::error::{ExtractError, Result};
use crate::extracted::{FieldExtractor, enrich_transactions};
use crate::matcher::match_message;
use crate::parser::{ParsedMessage, parse_message};
use crate::query::build_query;
use crate::source::MailSource;
use crate::types::{CardIdentity, Message, Transaction};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// State owned by a single run: the configured cards and the transactions
/// found so far (append-only)
#[derive(Debug, Clone)]
pub struct RunContext {
    cards: Vec<CardIdentity>,
    transactions: Vec<Transaction>,
}

impl RunContext {
    pub fn new(cards: Vec<CardIdentity>) -> Result<Self> {
        if cards.is_empty() {
            return Err(ExtractError::Config("run needs at least one card".into()));
        }
        Ok(Self {
            cards,
            transactions: Vec::new(),
        })
    }

    #[must_use]
    pub fn cards(&self) -> &[CardIdentity] {
        &self.cards
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    /// Parse one message and record its transactions.
    ///
    /// Per-message failures are logged, counted and skipped; only fatal
    /// errors are returned.
    pub fn process_message(&mut self, message: &Message, report: &mut RunReport) -> Result<()> {
        report.parsed += 1;

        let content = match parse_message(message) {
            Ok(ParsedMessage::Content(content)) => content,
            Ok(ParsedMessage::NoContent) => {
                info!(message_id = %message.id, "No content found, skipping");
                report.empty += 1;
                return Ok(());
            }
            Ok(ParsedMessage::Unsupported(mime_type)) => {
                info!(message_id = %message.id, %mime_type, "Unsupported MIME type, skipping");
                report.unsupported += 1;
                return Ok(());
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to parse message, skipping");
                report.decode_failures += 1;
                return Ok(());
            }
        };

        let found = match_message(message, &content, &self.cards);
        if found.is_empty() {
            report.unmatched += 1;
        }
        self.transactions.extend(found);
        Ok(())
    }
}

/// Counters describing how a run went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Handles returned by the search
    pub found: usize,

    /// Handles that could not be fetched; excluded from parsing
    pub fetch_failures: usize,

    /// Messages handed to the parser
    pub parsed: usize,

    pub unsupported: usize,
    pub empty: usize,
    pub decode_failures: usize,

    /// Parsed messages mentioning no configured card
    pub unmatched: usize,

    pub transactions: usize,
}

/// Search the source and fetch every hit.
///
/// A failed search aborts; a failed fetch drops that message, logs it and
/// counts it in `report.fetch_failures`.
pub fn fetch_messages(
    source: &mut dyn MailSource,
    query: &str,
    report: &mut RunReport,
) -> Result<Vec<Message>> {
    let handles = source.search(query)?;
    report.found = handles.len();
    info!(count = handles.len(), "Messages matched search");

    let mut messages = Vec::with_capacity(handles.len());
    for handle in &handles {
        match source.fetch(handle) {
            Ok(message) => messages.push(message),
            Err(e) => {
                warn!(message_id = %handle.id, error = %e, "Failed to fetch message");
                report.fetch_failures += 1;
            }
        }
    }

    Ok(messages)
}

/// Run the whole pipeline for a date window.
///
/// Transactions are appended to `context`; the returned report summarizes
/// what happened to every message.
pub fn run(
    context: &mut RunContext,
    source: &mut dyn MailSource,
    start_date: NaiveDate,
    end_date: NaiveDate,
    extractor: Option<&dyn FieldExtractor>,
) -> Result<RunReport> {
    let query = build_query(context.cards(), start_date, end_date)?;
    info!(%query, "Searching mail");

    let mut report = RunReport::default();
    let messages = fetch_messages(source, &query, &mut report)?;

    let first_new = context.transactions.len();
    for message in &messages {
        context.process_message(message, &mut report)?;
    }

    if let Some(extractor) = extractor {
        enrich_transactions(&mut context.transactions[first_new..], extractor);
    }

    report.transactions = context.transactions.len() - first_new;
    info!(
        found = report.found,
        fetch_failures = report.fetch_failures,
        transactions = report.transactions,
        "Run complete"
    );

    Ok(report)
}

/// Serialize transactions as a pretty-printed JSON array
pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    serde_json::to_writer_pretty(writer, transactions)?;
    Ok(())
}

/// Write transactions to `path`, creating parent directories as needed
pub fn save_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_transactions(&mut writer, transactions)?;
    writer.flush()?;
    info!(path = %path.display(), count = transactions.len(), "Saved transactions");
    Ok(())
}
