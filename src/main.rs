//! Command-line runner: cards CSV + exported messages -> transactions JSON

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use bank_mail_extract::{
    CueFieldExtractor, DirectorySource, FieldExtractor, RunContext, load_cards, run,
    save_transactions,
};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "bank-mail-extract",
    version,
    about = "Extract card transactions from bank notification emails"
)]
struct Cli {
    /// Card configuration CSV
    #[arg(long, default_value = "cards_config.csv")]
    cards: PathBuf,

    /// Directory of exported messages (Gmail API JSON or .eml)
    #[arg(long)]
    messages: PathBuf,

    /// First day of the search window (YYYY-MM-DD)
    #[arg(long)]
    after: NaiveDate,

    /// Day the search window ends (YYYY-MM-DD)
    #[arg(long)]
    before: NaiveDate,

    /// Where to write the transactions JSON
    #[arg(long, default_value = "transactions.json")]
    output: PathBuf,

    /// Fill amount and recipient with the built-in cue extractor
    #[arg(long)]
    extract_fields: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bank_mail_extract=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(cards = %cli.cards.display(), messages = %cli.messages.display(), "Starting run");

    let cards = load_cards(&cli.cards).context("loading card configuration")?;
    let mut context = RunContext::new(cards)?;
    let mut source = DirectorySource::new(&cli.messages);

    let extractor = CueFieldExtractor;
    let extractor = cli
        .extract_fields
        .then_some(&extractor as &dyn FieldExtractor);

    let report = run(&mut context, &mut source, cli.after, cli.before, extractor)
        .context("extraction run failed")?;
    info!(?report, "Run summary");

    save_transactions(&cli.output, context.transactions())
        .with_context(|| format!("writing {}", cli.output.display()))?;

    Ok(())
}
