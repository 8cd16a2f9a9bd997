//! CSV backfill: import a directory export into the churches table.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use steeple_common::Config;
use steeple_ingest::providers::CsvProvider;
use steeple_ingest::{ChurchProvider, ImportOptions, Importer};
use steeple_store::PgChurchStore;

#[derive(Parser)]
#[command(name = "backfill", about = "Import churches from a CSV export")]
struct Cli {
    /// Path to the CSV file (header: name,street,city,state,zip,lat,lng,phone,email,website,denomination)
    #[arg(long)]
    file: PathBuf,

    /// Report what would be imported without writing
    #[arg(long)]
    dry_run: bool,

    /// Import records even when a duplicate already exists
    #[arg(long)]
    allow_duplicates: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // EnvFilter matches full target segments, so each crate needs its own
    // directive; RUST_LOG still overrides everything.
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "steeple_ingest={level},steeple_store={level},steeple_common={level},places_client={level}"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::ingest_from_env()?;
    config.log_redacted();

    let provider = CsvProvider::new(&cli.file);
    if !provider.is_configured() {
        anyhow::bail!("CSV file not found: {}", cli.file.display());
    }

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = PgChurchStore::new(pool);
    store.migrate().await?;

    let records = provider.read_all()?;
    info!(count = records.len(), file = %cli.file.display(), "Read backfill records");

    let importer = Importer::new(
        Arc::new(store),
        ImportOptions {
            skip_duplicates: !cli.allow_duplicates,
            dry_run: cli.dry_run,
            ..Default::default()
        },
    );

    let counts = importer.import_records(&records).await;
    info!(%counts, "Backfill complete");
    println!("Backfill complete: {counts}");

    Ok(())
}
