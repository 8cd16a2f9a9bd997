//! Integration tests for PgChurchStore.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use steeple_common::{ChurchRecord, NEEDS_REVIEW_MARKER};
use steeple_store::{ChurchStore, EnrichmentUpdate, PgChurchStore};

/// Get a migrated test store, or skip if no test DB is available.
async fn test_store() -> Option<PgChurchStore> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    let store = PgChurchStore::new(pool.clone());
    store.migrate().await.ok()?;

    // Clean slate for each test
    sqlx::query("TRUNCATE churches")
        .execute(&pool)
        .await
        .ok()?;

    Some(store)
}

fn record(name: &str, state_abbr: &str, addr: &str) -> ChurchRecord {
    ChurchRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        street: "123 Main St".into(),
        city: "Springfield".into(),
        state: "Illinois".into(),
        state_abbr: state_abbr.into(),
        zip: Some("62701".into()),
        lat: Some(39.78),
        lng: Some(-89.65),
        phone: Some("(555) 123-4567".into()),
        email: None,
        website: Some("https://example.org".into()),
        denomination: None,
        worship_styles: vec![],
        service_times: vec![],
        has_kids_ministry: false,
        has_youth_group: false,
        has_small_groups: false,
        ai_description: None,
        ai_what_to_expect: None,
        enriched_at: None,
        normalized_address: addr.into(),
        normalized_phone: Some("5551234567".into()),
        source: "test".into(),
        source_id: Some("place-1".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn insert_then_find_roundtrip() {
    let Some(store) = test_store().await else {
        return;
    };

    let r = record("First Baptist Church", "IL", "123 main st springfield illinois");
    store.insert(&r).await.unwrap();

    let found = store.find_by_id(r.id).await.unwrap().unwrap();
    assert_eq!(found.name, "First Baptist Church");
    assert_eq!(found.state_abbr, "IL");
    assert!(found.ai_description.is_none());
}

#[tokio::test]
async fn duplicate_address_match_wins_over_phone() {
    let Some(store) = test_store().await else {
        return;
    };

    let mut phone_twin = record("Phone Twin", "IL", "9 other rd");
    phone_twin.normalized_address = "9 other rd".into();
    let addr_twin = record("Address Twin", "IL", "123 main st");
    store.insert(&phone_twin).await.unwrap();
    store.insert(&addr_twin).await.unwrap();

    let hit = store
        .find_duplicate("123 main st", Some("5551234567"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.name, "Address Twin");
}

#[tokio::test]
async fn enrichment_removes_record_from_batches() {
    let Some(store) = test_store().await else {
        return;
    };

    let r = record("Grace Fellowship", "MN", "1 grace way");
    store.insert(&r).await.unwrap();
    assert_eq!(store.unenriched_batch("MN", 50).await.unwrap().len(), 1);

    let update = EnrichmentUpdate {
        ai_description: "A welcoming congregation.".into(),
        ai_what_to_expect: "Dress is casual.".into(),
        denomination: Some("Baptist".into()),
        worship_styles: Some(vec!["contemporary".into()]),
        has_kids_ministry: Some(true),
        ..Default::default()
    };
    store.apply_enrichment(r.id, &update).await.unwrap();

    assert!(store.unenriched_batch("MN", 50).await.unwrap().is_empty());

    let enriched = store.find_by_id(r.id).await.unwrap().unwrap();
    assert_eq!(enriched.denomination.as_deref(), Some("Baptist"));
    assert!(enriched.has_kids_ministry);
    assert!(enriched.enriched_at.is_some());
}

#[tokio::test]
async fn none_overrides_keep_existing_values() {
    let Some(store) = test_store().await else {
        return;
    };

    let mut r = record("St. Mary Parish", "WI", "2 parish ln");
    r.denomination = Some("Catholic".into());
    store.insert(&r).await.unwrap();

    let update = EnrichmentUpdate {
        ai_description: "Historic parish.".into(),
        ai_what_to_expect: "Mass times vary.".into(),
        denomination: None,
        ..Default::default()
    };
    store.apply_enrichment(r.id, &update).await.unwrap();

    let after = store.find_by_id(r.id).await.unwrap().unwrap();
    assert_eq!(after.denomination.as_deref(), Some("Catholic"));
}

#[tokio::test]
async fn needs_review_and_delete() {
    let Some(store) = test_store().await else {
        return;
    };

    let keep = record("Ambiguous Chapel", "TX", "3 vague st");
    let drop = record("Joe's Plumbing", "TX", "4 pipe ave");
    store.insert(&keep).await.unwrap();
    store.insert(&drop).await.unwrap();

    store.mark_needs_review(keep.id).await.unwrap();
    store.delete(drop.id).await.unwrap();

    let kept = store.find_by_id(keep.id).await.unwrap().unwrap();
    assert_eq!(kept.ai_description.as_deref(), Some(NEEDS_REVIEW_MARKER));
    assert!(store.find_by_id(drop.id).await.unwrap().is_none());
    // The sentinel also removes the kept row from the unenriched set
    assert!(store.unenriched_batch("TX", 50).await.unwrap().is_empty());
}
