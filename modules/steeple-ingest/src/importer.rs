use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use steeple_common::{ChurchRecord, RawChurch};
use steeple_store::ChurchStore;

use crate::denominations::{infer_denomination_from_name, map_denomination};
use crate::normalize::{normalize_address, normalize_phone};
use crate::provider::{ChurchProvider, SearchParams};

/// Default delay between provider calls in a multi-location batch, to
/// respect upstream rate limits.
const LOCATION_DELAY: Duration = Duration::from_millis(1500);

/// Ceiling on result pages fetched per location. Upstream stops issuing
/// tokens well before this; it only guards against a misbehaving provider.
const MAX_PAGES: u32 = 10;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub skip_duplicates: bool,
    pub dry_run: bool,
    pub max_results_per_location: Option<u32>,
    pub location_delay: Duration,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
            dry_run: false,
            max_results_per_location: None,
            location_delay: LOCATION_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportCounts {
    pub imported: u32,
    pub skipped: u32,
    pub errors: u32,
}

impl ImportCounts {
    pub fn add(&mut self, other: ImportCounts) {
        self.imported += other.imported;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

impl std::fmt::Display for ImportCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "imported={} skipped={} errors={}",
            self.imported, self.skipped, self.errors
        )
    }
}

/// One requested city/state in a batch import.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Per-location outcome of a batch import. A failed location carries its
/// error message so callers can tell which requests succeeded.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LocationResult {
    pub city: String,
    pub state: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub counts: ImportCounts,
}

/// Dedup-aware batch importer. Looks up existing rows by normalized
/// address/phone before inserting; denomination resolves through
/// explicit value → category map → name inference.
pub struct Importer {
    store: Arc<dyn ChurchStore>,
    options: ImportOptions,
}

impl Importer {
    pub fn new(store: Arc<dyn ChurchStore>, options: ImportOptions) -> Self {
        Self { store, options }
    }

    /// Import one provider batch. A single record's failure is counted and
    /// does not abort the rest of the batch.
    pub async fn import_records(&self, records: &[RawChurch]) -> ImportCounts {
        let mut counts = ImportCounts::default();

        for raw in records {
            match self.import_one(raw).await {
                Ok(true) => counts.imported += 1,
                Ok(false) => counts.skipped += 1,
                Err(e) => {
                    warn!(name = %raw.name, error = %e, "Failed to import record");
                    counts.errors += 1;
                }
            }
        }

        counts
    }

    /// Returns Ok(true) if inserted, Ok(false) if skipped as a duplicate.
    async fn import_one(&self, raw: &RawChurch) -> Result<bool> {
        let normalized_address = normalize_address(&raw.street, &raw.city, &raw.state);
        let normalized_phone = raw.phone.as_deref().and_then(normalize_phone);

        let existing = self
            .store
            .find_duplicate(&normalized_address, normalized_phone.as_deref())
            .await?;

        if existing.is_some() && self.options.skip_duplicates {
            return Ok(false);
        }

        if self.options.dry_run {
            info!(name = %raw.name, "Dry run: would import");
            return Ok(true);
        }

        let record = build_record(raw, normalized_address, normalized_phone);
        self.store.insert(&record).await?;
        Ok(true)
    }

    /// Import every requested location exactly once, in order, with an
    /// inter-request delay. One location's failure is isolated and reported
    /// in its result entry; remaining locations still run.
    pub async fn import_locations(
        &self,
        provider: &dyn ChurchProvider,
        locations: &[Location],
    ) -> Vec<LocationResult> {
        let mut results = Vec::with_capacity(locations.len());

        for (i, location) in locations.iter().enumerate() {
            if i > 0 && !self.options.location_delay.is_zero() {
                tokio::time::sleep(self.options.location_delay).await;
            }

            let result = match self.import_location(provider, location).await {
                Ok(counts) => {
                    info!(city = %location.city, state = %location.state, %counts, "Location imported");
                    LocationResult {
                        city: location.city.clone(),
                        state: location.state.clone(),
                        success: true,
                        error: None,
                        counts,
                    }
                }
                Err(e) => {
                    warn!(city = %location.city, state = %location.state, error = %e, "Location import failed");
                    LocationResult {
                        city: location.city.clone(),
                        state: location.state.clone(),
                        success: false,
                        error: Some(e.to_string()),
                        counts: ImportCounts::default(),
                    }
                }
            };
            results.push(result);
        }

        results
    }

    /// Walk every result page for one location. Follows the provider's page
    /// token until it runs out, the per-location cap is met, or the page
    /// ceiling is hit.
    async fn import_location(
        &self,
        provider: &dyn ChurchProvider,
        location: &Location,
    ) -> Result<ImportCounts> {
        let max = self.options.max_results_per_location;
        let mut counts = ImportCounts::default();
        let mut fetched: u32 = 0;
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let params = SearchParams {
                city: location.city.clone(),
                state: location.state.clone(),
                radius_km: location.radius_km,
                max_results: max.map(|m| m.saturating_sub(fetched)),
                page_token: page_token.take(),
            };
            let outcome = provider.search_churches(&params).await?;
            fetched += outcome.records.len() as u32;
            counts.add(self.import_records(&outcome.records).await);

            page_token = outcome.next_page_token;
            let cap_reached = max.is_some_and(|m| fetched >= m);
            if page_token.is_none() || cap_reached || outcome.records.is_empty() {
                break;
            }
        }

        Ok(counts)
    }
}

fn build_record(
    raw: &RawChurch,
    normalized_address: String,
    normalized_phone: Option<String>,
) -> ChurchRecord {
    // Explicit denomination wins; a raw category string that happens to be
    // in the map is canonicalized; otherwise infer from the name.
    let denomination = raw
        .denomination
        .as_deref()
        .map(|d| match map_denomination(d) {
            Some(canonical) => canonical.to_string(),
            None => d.to_string(),
        })
        .or_else(|| infer_denomination_from_name(&raw.name).map(String::from));

    let now = Utc::now();
    ChurchRecord {
        id: Uuid::new_v4(),
        name: raw.name.clone(),
        street: raw.street.clone(),
        city: raw.city.clone(),
        state: raw.state.clone(),
        state_abbr: raw.state_abbr.clone(),
        zip: raw.zip.clone(),
        lat: Some(raw.lat),
        lng: Some(raw.lng),
        phone: raw.phone.clone(),
        email: raw.email.clone(),
        website: raw.website.clone(),
        denomination,
        worship_styles: Vec::new(),
        service_times: Vec::new(),
        has_kids_ministry: false,
        has_youth_group: false,
        has_small_groups: false,
        ai_description: None,
        ai_what_to_expect: None,
        enriched_at: None,
        normalized_address,
        normalized_phone,
        source: raw.source.clone(),
        source_id: raw.source_id.clone(),
        created_at: now,
        updated_at: now,
    }
}
