//! Enrichment CLI: pulls un-enriched churches from Postgres and runs the
//! sharded worker pool against the configured AI provider.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::{Claude, CompletionModel, OpenAi};
use steeple_common::Config;
use steeple_enrich::{Enricher, WorkerOptions, WorkerPool};
use steeple_store::{ChurchStore, PgChurchStore};

const CLAUDE_MODEL: &str = "claude-haiku-4-5-20251001";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Parser)]
#[command(name = "steeple-enrich", about = "AI-enrich church directory records")]
struct Cli {
    /// Records pulled per store query
    #[arg(long, default_value_t = 50)]
    batch: u32,

    /// Keep going until every shard is exhausted instead of stopping after
    /// one batch worth of records
    #[arg(long)]
    all: bool,

    /// Concurrent workers; states are split round-robin between them
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Fetch and enrich but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Enrich from stored data only, without fetching websites
    #[arg(long)]
    skip_website: bool,

    /// Stop after this many records across all workers
    #[arg(long)]
    limit: Option<u64>,

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
            "steeple_enrich={level},steeple_store={level},steeple_common={level},ai_client={level}"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::enrich_from_env()?;
    config.require_ai_provider()?;
    config.log_redacted();

    let model: Arc<dyn CompletionModel> = match (&config.anthropic_api_key, &config.openai_api_key)
    {
        (Some(key), _) => Arc::new(Claude::new(key.as_str(), CLAUDE_MODEL)),
        (None, Some(key)) => Arc::new(OpenAi::new(key.as_str(), OPENAI_MODEL)),
        (None, None) => unreachable!("require_ai_provider checked above"),
    };
    info!(model = model.name(), "Using completion model");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(cli.workers as u32 + 1)
        .connect(&config.database_url)
        .await?;
    let store = PgChurchStore::new(pool);
    store.migrate().await?;
    let store: Arc<dyn ChurchStore> = Arc::new(store);

    let remaining = store.count_unenriched().await?;
    if remaining == 0 {
        println!("Nothing to enrich.");
        return Ok(());
    }
    info!(remaining, workers = cli.workers, "Starting enrichment run");
    if cli.dry_run {
        warn!("Dry run: no records will be written or deleted");
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Shutdown requested; workers will stop after the current record");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    // Without --all, a run covers at most one batch worth of records.
    let limit = match (cli.all, cli.limit) {
        (true, limit) => limit,
        (false, Some(limit)) => Some(limit.min(cli.batch as u64)),
        (false, None) => Some(cli.batch as u64),
    };

    let options = WorkerOptions {
        batch_size: cli.batch,
        workers: cli.workers,
        dry_run: cli.dry_run,
        skip_website: cli.skip_website,
        limit,
        record_delay: Duration::from_millis(1200),
        error_delay: Duration::from_secs(10),
    };
    let workers = WorkerPool::new(store, Arc::new(Enricher::new(model)), options, cancel);

    let stats = workers.run().await;
    info!(%stats, "Enrichment run complete");
    println!("Enrichment complete: {stats}");

    Ok(())
}
