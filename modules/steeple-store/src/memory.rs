use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use steeple_common::{ChurchRecord, NEEDS_REVIEW_MARKER};

use crate::{ChurchStore, EnrichmentUpdate};

/// In-memory store for pipeline tests. Same visible semantics as the
/// Postgres store, minus persistence.
#[derive(Default)]
pub struct MemoryChurchStore {
    records: Mutex<Vec<ChurchRecord>>,
}

impl MemoryChurchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all records, for assertions.
    pub fn all(&self) -> Vec<ChurchRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChurchStore for MemoryChurchStore {
    async fn insert(&self, church: &ChurchRecord) -> Result<()> {
        self.records.lock().unwrap().push(church.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_duplicate(
        &self,
        normalized_address: &str,
        normalized_phone: Option<&str>,
    ) -> Result<Option<ChurchRecord>> {
        let records = self.records.lock().unwrap();
        if let Some(hit) = records
            .iter()
            .find(|r| r.normalized_address == normalized_address)
        {
            return Ok(Some(hit.clone()));
        }
        if let Some(phone) = normalized_phone {
            if let Some(hit) = records
                .iter()
                .find(|r| r.normalized_phone.as_deref() == Some(phone))
            {
                return Ok(Some(hit.clone()));
            }
        }
        Ok(None)
    }

    async fn unenriched_batch(&self, state_abbr: &str, limit: u32) -> Result<Vec<ChurchRecord>> {
        let records = self.records.lock().unwrap();
        let mut matches: Vec<ChurchRecord> = records
            .iter()
            .filter(|r| r.state_abbr == state_abbr && r.ai_description.is_none())
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.created_at);
        matches.truncate(limit as usize);
        Ok(matches)
    }

    async fn count_unenriched(&self) -> Result<u64> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.ai_description.is_none())
            .count() as u64)
    }

    async fn apply_enrichment(&self, id: Uuid, update: &EnrichmentUpdate) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.id == id) {
            r.ai_description = Some(update.ai_description.clone());
            r.ai_what_to_expect = Some(update.ai_what_to_expect.clone());
            if let Some(d) = &update.denomination {
                r.denomination = Some(d.clone());
            }
            if let Some(w) = &update.worship_styles {
                r.worship_styles = w.clone();
            }
            if let Some(s) = &update.service_times {
                r.service_times = s.clone();
            }
            if let Some(e) = &update.email {
                r.email = Some(e.clone());
            }
            if let Some(v) = update.has_kids_ministry {
                r.has_kids_ministry = v;
            }
            if let Some(v) = update.has_youth_group {
                r.has_youth_group = v;
            }
            if let Some(v) = update.has_small_groups {
                r.has_small_groups = v;
            }
            r.enriched_at = Some(Utc::now());
            r.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_needs_review(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.id == id) {
            r.ai_description = Some(NEEDS_REVIEW_MARKER.to_string());
            r.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}
