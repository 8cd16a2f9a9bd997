//! Sharded enrichment worker pool. States are statically partitioned across
//! workers, so write sets are disjoint by construction and no locking is
//! needed; the store is the only shared resource.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use steeple_common::{all_state_abbrs, ChurchRecord};
use steeple_store::{ChurchStore, EnrichmentUpdate};

use crate::enricher::{Enricher, EnrichmentContext, EnrichmentResult};
use crate::fetcher::{FetchedSite, SiteFetcher};
use crate::heuristics::looks_like_church;

// =============================================================================
// Options & stats
// =============================================================================

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Records pulled per store query. A short pull ends the shard.
    pub batch_size: u32,
    pub workers: usize,
    /// Fetch and enrich but skip all store writes.
    pub dry_run: bool,
    /// Enrich from provider data alone, without fetching websites.
    pub skip_website: bool,
    /// Stop the whole pool after this many records (counted across workers).
    pub limit: Option<u64>,
    /// Pause after every record, sized to the upstream requests-per-minute
    /// budget across all workers.
    pub record_delay: Duration,
    /// Longer pause after an error, letting transient rate limits clear.
    pub error_delay: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            workers: 4,
            dry_run: false,
            skip_website: false,
            limit: None,
            record_delay: Duration::from_millis(1200),
            error_delay: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: u64,
    pub enriched: u64,
    pub needs_review: u64,
    pub deleted: u64,
    pub errors: u64,
}

impl RunStats {
    pub fn add(&mut self, other: &RunStats) {
        self.processed += other.processed;
        self.enriched += other.enriched;
        self.needs_review += other.needs_review;
        self.deleted += other.deleted;
        self.errors += other.errors;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed: {} enriched, {} flagged for review, {} deleted, {} errors",
            self.processed, self.enriched, self.needs_review, self.deleted, self.errors
        )
    }
}

// =============================================================================
// Shard partitioning
// =============================================================================

/// Round-robin distribution of every state shard across `workers` slots.
/// The resulting sets are disjoint and cover all states.
pub fn partition_shards(workers: usize) -> Vec<Vec<&'static str>> {
    let workers = workers.max(1);
    let mut shards: Vec<Vec<&'static str>> = vec![Vec::new(); workers];
    for (i, abbr) in all_state_abbrs().into_iter().enumerate() {
        shards[i % workers].push(abbr);
    }
    shards
}

// =============================================================================
// Pool
// =============================================================================

pub struct WorkerPool {
    store: Arc<dyn ChurchStore>,
    enricher: Arc<Enricher>,
    fetcher: Arc<SiteFetcher>,
    options: WorkerOptions,
    cancel: Arc<AtomicBool>,
}

impl WorkerPool {
    pub fn new(
        store: Arc<dyn ChurchStore>,
        enricher: Arc<Enricher>,
        options: WorkerOptions,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            enricher,
            fetcher: Arc::new(SiteFetcher::new()),
            options,
            cancel,
        }
    }

    /// Run every worker to completion and return aggregated stats.
    pub async fn run(&self) -> RunStats {
        let shards = partition_shards(self.options.workers);
        let processed = Arc::new(AtomicU64::new(0));

        let handles: Vec<_> = shards
            .into_iter()
            .enumerate()
            .filter(|(_, shard_set)| !shard_set.is_empty())
            .map(|(worker_id, shard_set)| {
                let worker = Worker {
                    id: worker_id,
                    store: self.store.clone(),
                    enricher: self.enricher.clone(),
                    fetcher: self.fetcher.clone(),
                    options: self.options.clone(),
                    cancel: self.cancel.clone(),
                    processed: processed.clone(),
                };
                tokio::spawn(async move { worker.run(shard_set).await })
            })
            .collect();

        let mut total = RunStats::default();
        for result in join_all(handles).await {
            match result {
                Ok(stats) => total.add(&stats),
                Err(e) => error!(error = %e, "Worker task panicked"),
            }
        }
        total
    }
}

// =============================================================================
// Worker loop
// =============================================================================

struct Worker {
    id: usize,
    store: Arc<dyn ChurchStore>,
    enricher: Arc<Enricher>,
    fetcher: Arc<SiteFetcher>,
    options: WorkerOptions,
    cancel: Arc<AtomicBool>,
    processed: Arc<AtomicU64>,
}

#[derive(Clone, Copy)]
enum Outcome {
    Enriched,
    NeedsReview,
    Deleted,
    Errored,
}

impl Worker {
    async fn run(&self, shards: Vec<&'static str>) -> RunStats {
        let mut stats = RunStats::default();

        for shard in shards {
            if self.should_stop() {
                break;
            }
            self.run_shard(shard, &mut stats).await;
        }

        info!(worker = self.id, %stats, "Worker finished");
        stats
    }

    async fn run_shard(&self, shard: &str, stats: &mut RunStats) {
        loop {
            if self.should_stop() {
                return;
            }

            let batch = match self
                .store
                .unenriched_batch(shard, self.options.batch_size)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    error!(worker = self.id, shard, error = %e, "Batch query failed");
                    stats.errors += 1;
                    return;
                }
            };

            if batch.is_empty() {
                return;
            }
            let short_pull = (batch.len() as u32) < self.options.batch_size;
            debug!(worker = self.id, shard, count = batch.len(), "Pulled batch");

            // Rows this page actually removed from the unenriched set.
            // Errors leave the row in place, and dry runs write nothing.
            let mut removed = 0u32;
            for record in batch {
                if self.should_stop() {
                    return;
                }

                let outcome = self.process_record(&record).await;
                stats.processed += 1;
                self.processed.fetch_add(1, Ordering::Relaxed);
                if !self.options.dry_run && !matches!(outcome, Outcome::Errored) {
                    removed += 1;
                }

                let delay = match outcome {
                    Outcome::Enriched => {
                        stats.enriched += 1;
                        self.options.record_delay
                    }
                    Outcome::NeedsReview => {
                        stats.needs_review += 1;
                        self.options.record_delay
                    }
                    Outcome::Deleted => {
                        stats.deleted += 1;
                        self.options.record_delay
                    }
                    Outcome::Errored => {
                        stats.errors += 1;
                        self.options.error_delay
                    }
                };
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            // Fewer rows than a full page means this shard is nearly done;
            // enrichment removes rows monotonically, so stop pulling.
            if short_pull {
                return;
            }
            // A full page that removed nothing would come back verbatim on
            // the next pull; leave the shard instead of spinning on it.
            if removed == 0 {
                debug!(worker = self.id, shard, "Full page made no progress; leaving shard");
                return;
            }
        }
    }

    /// One record through fetch → enrich → persist. Errors never mutate the
    /// record; it stays un-enriched and is retried on a later run.
    async fn process_record(&self, record: &ChurchRecord) -> Outcome {
        let site = match (&record.website, self.options.skip_website) {
            (Some(url), false) => self.fetcher.fetch(url).await,
            _ => FetchedSite::default(),
        };

        let context = EnrichmentContext {
            name: &record.name,
            city: &record.city,
            state: &record.state,
            denomination: record.denomination.as_deref(),
            website: record.website.as_deref(),
            website_content: site.content.as_deref(),
        };

        let result = match self.enricher.generate(&context).await {
            Ok(result) => result,
            Err(e) => {
                warn!(worker = self.id, name = %record.name, error = %e, "Enrichment failed");
                return Outcome::Errored;
            }
        };

        if result.is_empty() {
            return self.handle_empty(record).await;
        }

        let update = build_update(result, site.email, record);
        if self.options.dry_run {
            info!(worker = self.id, name = %record.name, "Dry run: would enrich");
            return Outcome::Enriched;
        }
        match self.store.apply_enrichment(record.id, &update).await {
            Ok(()) => {
                info!(worker = self.id, name = %record.name, "Enriched");
                Outcome::Enriched
            }
            Err(e) => {
                error!(worker = self.id, name = %record.name, error = %e, "Failed to save enrichment");
                Outcome::Errored
            }
        }
    }

    /// The model produced nothing usable. A churchy name gets the review
    /// sentinel and stays; anything else is treated as a non-church listing
    /// and removed.
    async fn handle_empty(&self, record: &ChurchRecord) -> Outcome {
        if looks_like_church(&record.name) {
            if self.options.dry_run {
                info!(worker = self.id, name = %record.name, "Dry run: would flag for review");
                return Outcome::NeedsReview;
            }
            match self.store.mark_needs_review(record.id).await {
                Ok(()) => {
                    warn!(worker = self.id, name = %record.name, "Flagged for review");
                    Outcome::NeedsReview
                }
                Err(e) => {
                    error!(worker = self.id, name = %record.name, error = %e, "Failed to flag record");
                    Outcome::Errored
                }
            }
        } else {
            if self.options.dry_run {
                info!(worker = self.id, name = %record.name, "Dry run: would delete non-church");
                return Outcome::Deleted;
            }
            match self.store.delete(record.id).await {
                Ok(()) => {
                    warn!(worker = self.id, name = %record.name, "Deleted non-church record");
                    Outcome::Deleted
                }
                Err(e) => {
                    error!(worker = self.id, name = %record.name, error = %e, "Failed to delete record");
                    Outcome::Errored
                }
            }
        }
    }

    fn should_stop(&self) -> bool {
        if self.cancel.load(Ordering::Relaxed) {
            return true;
        }
        match self.options.limit {
            Some(limit) => self.processed.load(Ordering::Relaxed) >= limit,
            None => false,
        }
    }
}

fn build_update(
    result: EnrichmentResult,
    email: Option<String>,
    record: &ChurchRecord,
) -> EnrichmentUpdate {
    EnrichmentUpdate {
        ai_description: result.description,
        ai_what_to_expect: result.what_to_expect,
        denomination: result.denomination,
        worship_styles: result.worship_styles,
        service_times: result.service_times,
        // A scraped contact email never overwrites one we already have.
        email: if record.email.is_none() { email } else { None },
        has_kids_ministry: result.has_kids_ministry,
        has_youth_group: result.has_youth_group,
        has_small_groups: result.has_small_groups,
    }
}
