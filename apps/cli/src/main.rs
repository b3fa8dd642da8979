//! # Tally CLI
//!
//! Command-line front end for the invoice engine.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tally seed [--count N]                  demo catalog (empty DB only)   │
//! │  tally products [--limit N]              list catalog                   │
//! │  tally create-invoice --item ID:QTY ...  create an invoice              │
//! │        [--customer NAME] [--notes TEXT] [--method cash|card|upi] [--paid]│
//! │  tally show-invoice <ID or NUMBER>       one invoice with line items    │
//! │  tally invoices [--limit N]              newest invoices first          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output is pretty-printed JSON on stdout; logs go to stderr.

mod cli;
mod config;
mod seed;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::TallyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = TallyConfig::load().context("loading configuration")?;
    info!(
        path = %config.db_path.display(),
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    let db = tally_db::Database::new(config.db_config())
        .await
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;

    let result = cli::run(cli.command, &db).await;
    db.close().await;

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: `info,tally=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
