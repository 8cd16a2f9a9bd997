use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use steeple_common::{ChurchRecord, ServiceTime};

use crate::{ChurchStore, EnrichmentUpdate};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `churches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChurchRow {
    id: Uuid,
    name: String,
    street: String,
    city: String,
    state: String,
    state_abbr: String,
    zip: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    denomination: Option<String>,
    worship_styles: Vec<String>,
    service_times: serde_json::Value,
    has_kids_ministry: bool,
    has_youth_group: bool,
    has_small_groups: bool,
    ai_description: Option<String>,
    ai_what_to_expect: Option<String>,
    enriched_at: Option<DateTime<Utc>>,
    normalized_address: String,
    normalized_phone: Option<String>,
    source: String,
    source_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChurchRow {
    fn into_record(self) -> ChurchRecord {
        let service_times: Vec<ServiceTime> =
            serde_json::from_value(self.service_times).unwrap_or_default();
        ChurchRecord {
            id: self.id,
            name: self.name,
            street: self.street,
            city: self.city,
            state: self.state,
            state_abbr: self.state_abbr,
            zip: self.zip,
            lat: self.lat,
            lng: self.lng,
            phone: self.phone,
            email: self.email,
            website: self.website,
            denomination: self.denomination,
            worship_styles: self.worship_styles,
            service_times,
            has_kids_ministry: self.has_kids_ministry,
            has_youth_group: self.has_youth_group,
            has_small_groups: self.has_small_groups,
            ai_description: self.ai_description,
            ai_what_to_expect: self.ai_what_to_expect,
            enriched_at: self.enriched_at,
            normalized_address: self.normalized_address,
            normalized_phone: self.normalized_phone,
            source: self.source,
            source_id: self.source_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, name, street, city, state, state_abbr, zip, lat, lng,
    phone, email, website, denomination, worship_styles, service_times,
    has_kids_ministry, has_youth_group, has_small_groups,
    ai_description, ai_what_to_expect, enriched_at,
    normalized_address, normalized_phone, source, source_id,
    created_at, updated_at
"#;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgChurchStore {
    pool: PgPool,
}

impl PgChurchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ChurchStore for PgChurchStore {
    async fn insert(&self, church: &ChurchRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO churches
                (id, name, street, city, state, state_abbr, zip, lat, lng,
                 phone, email, website, denomination, worship_styles, service_times,
                 has_kids_ministry, has_youth_group, has_small_groups,
                 ai_description, ai_what_to_expect, enriched_at,
                 normalized_address, normalized_phone, source, source_id,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            "#,
        )
        .bind(church.id)
        .bind(&church.name)
        .bind(&church.street)
        .bind(&church.city)
        .bind(&church.state)
        .bind(&church.state_abbr)
        .bind(&church.zip)
        .bind(church.lat)
        .bind(church.lng)
        .bind(&church.phone)
        .bind(&church.email)
        .bind(&church.website)
        .bind(&church.denomination)
        .bind(&church.worship_styles)
        .bind(serde_json::to_value(&church.service_times)?)
        .bind(church.has_kids_ministry)
        .bind(church.has_youth_group)
        .bind(church.has_small_groups)
        .bind(&church.ai_description)
        .bind(&church.ai_what_to_expect)
        .bind(church.enriched_at)
        .bind(&church.normalized_address)
        .bind(&church.normalized_phone)
        .bind(&church.source)
        .bind(&church.source_id)
        .bind(church.created_at)
        .bind(church.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurchRecord>> {
        let row = sqlx::query_as::<_, ChurchRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM churches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChurchRow::into_record))
    }

    async fn find_duplicate(
        &self,
        normalized_address: &str,
        normalized_phone: Option<&str>,
    ) -> Result<Option<ChurchRecord>> {
        let by_address = sqlx::query_as::<_, ChurchRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM churches WHERE normalized_address = $1 LIMIT 1"
        ))
        .bind(normalized_address)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = by_address {
            return Ok(Some(row.into_record()));
        }

        let Some(phone) = normalized_phone else {
            return Ok(None);
        };

        let by_phone = sqlx::query_as::<_, ChurchRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM churches WHERE normalized_phone = $1 LIMIT 1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(by_phone.map(ChurchRow::into_record))
    }

    async fn unenriched_batch(&self, state_abbr: &str, limit: u32) -> Result<Vec<ChurchRecord>> {
        let rows = sqlx::query_as::<_, ChurchRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM churches
            WHERE state_abbr = $1 AND ai_description IS NULL
            ORDER BY created_at ASC
            LIMIT $2
            "#
        ))
        .bind(state_abbr)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ChurchRow::into_record).collect())
    }

    async fn count_unenriched(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM churches WHERE ai_description IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    async fn apply_enrichment(&self, id: Uuid, update: &EnrichmentUpdate) -> Result<()> {
        let service_times = update
            .service_times
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE churches SET
                ai_description = $2,
                ai_what_to_expect = $3,
                denomination = COALESCE($4, denomination),
                worship_styles = COALESCE($5, worship_styles),
                service_times = COALESCE($6, service_times),
                email = COALESCE($7, email),
                has_kids_ministry = COALESCE($8, has_kids_ministry),
                has_youth_group = COALESCE($9, has_youth_group),
                has_small_groups = COALESCE($10, has_small_groups),
                enriched_at = now(),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.ai_description)
        .bind(&update.ai_what_to_expect)
        .bind(&update.denomination)
        .bind(&update.worship_styles)
        .bind(service_times)
        .bind(&update.email)
        .bind(update.has_kids_ministry)
        .bind(update.has_youth_group)
        .bind(update.has_small_groups)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_needs_review(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE churches SET ai_description = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(steeple_common::NEEDS_REVIEW_MARKER)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM churches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
