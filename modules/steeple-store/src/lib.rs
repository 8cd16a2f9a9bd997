pub mod memory;
pub mod pg;

pub use memory::MemoryChurchStore;
pub use pg::PgChurchStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use steeple_common::{ChurchRecord, ServiceTime};

/// Partial field set written back after a successful enrichment.
/// `None` override fields leave the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentUpdate {
    pub ai_description: String,
    pub ai_what_to_expect: String,
    pub denomination: Option<String>,
    pub worship_styles: Option<Vec<String>>,
    pub service_times: Option<Vec<ServiceTime>>,
    pub email: Option<String>,
    pub has_kids_ministry: Option<bool>,
    pub has_youth_group: Option<bool>,
    pub has_small_groups: Option<bool>,
}

/// Persistence surface the pipeline depends on. The store exclusively owns
/// record lifetime; callers receive snapshots and write back by id.
#[async_trait]
pub trait ChurchStore: Send + Sync {
    async fn insert(&self, church: &ChurchRecord) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchRecord>>;

    /// Look up an existing record by normalized dedup keys. An address match
    /// takes priority over a phone match.
    async fn find_duplicate(
        &self,
        normalized_address: &str,
        normalized_phone: Option<&str>,
    ) -> Result<Option<ChurchRecord>>;

    /// Un-enriched records (`ai_description IS NULL`) for one state shard,
    /// ordered by insertion time ascending. Callers re-query after processing
    /// a page; enrichment monotonically removes rows from this set, so no
    /// offset is needed.
    async fn unenriched_batch(&self, state_abbr: &str, limit: u32) -> Result<Vec<ChurchRecord>>;

    async fn count_unenriched(&self) -> Result<u64>;

    /// Merge enrichment output into a record and stamp `enriched_at`.
    async fn apply_enrichment(&self, id: Uuid, update: &EnrichmentUpdate) -> Result<()>;

    /// Write the needs-review sentinel so the record is permanently excluded
    /// from future batches without being deleted.
    async fn mark_needs_review(&self, id: Uuid) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
