use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel written to `ai_description` when the model returned empty output
/// for something that still looks like a church. Because the unenriched
/// predicate is `ai_description IS NULL`, the sentinel permanently excludes
/// the row from future enrichment batches. A human can clear the field to
/// re-queue the record; no in-repo workflow does so.
pub const NEEDS_REVIEW_MARKER: &str = "[NEEDS REVIEW]";

/// Fixed worship-style vocabulary. The enrichment model is instructed to pick
/// from this list; anything else is dropped during coercion.
pub const WORSHIP_STYLES: &[&str] = &[
    "traditional",
    "contemporary",
    "blended",
    "charismatic",
    "liturgical",
    "gospel",
];

// =============================================================================
// Canonical church record
// =============================================================================

/// One service-time entry: day of week, clock time, optional label
/// ("Sunday School", "Evening Service").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTime {
    pub day: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Canonical directory entity. Owned by the store; pipeline components work
/// on per-batch snapshots and write back through update calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurchRecord {
    pub id: Uuid,
    pub name: String,

    // Postal address
    pub street: String,
    pub city: String,
    /// Full state name ("Illinois").
    pub state: String,
    /// Two-letter abbreviation ("IL"). Shard key for the worker pool.
    pub state_abbr: String,
    pub zip: Option<String>,

    // Coordinates
    pub lat: Option<f64>,
    pub lng: Option<f64>,

    // Contact
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,

    // Classification
    pub denomination: Option<String>,
    pub worship_styles: Vec<String>,
    pub service_times: Vec<ServiceTime>,
    pub has_kids_ministry: bool,
    pub has_youth_group: bool,
    pub has_small_groups: bool,

    // AI enrichment. A record is "enriched" iff ai_description is non-null.
    pub ai_description: Option<String>,
    pub ai_what_to_expect: Option<String>,
    pub enriched_at: Option<DateTime<Utc>>,

    // Dedup keys, computed at insert time
    pub normalized_address: String,
    pub normalized_phone: Option<String>,

    // Provenance
    pub source: String,
    pub source_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChurchRecord {
    pub fn is_enriched(&self) -> bool {
        self.ai_description.is_some()
    }

    pub fn needs_review(&self) -> bool {
        self.ai_description.as_deref() == Some(NEEDS_REVIEW_MARKER)
    }
}

// =============================================================================
// Raw acquisition record
// =============================================================================

/// Named-day opening window produced by provider hours mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    pub day: String,
    pub open: String,
    pub close: String,
}

/// Provider-agnostic intermediate record. Transient: consumed by the
/// ingestion orchestrator and either inserted as a ChurchRecord or
/// discarded as a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChurch {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub state_abbr: String,
    pub zip: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub denomination: Option<String>,
    pub hours: Vec<OpenHours>,
    pub rating: Option<f64>,
    pub source: String,
    pub source_id: Option<String>,
}
