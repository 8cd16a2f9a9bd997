//! Worker pool behavior against the in-memory store and a scripted model:
//! success merge, needs-review sentinel, non-church delete, and error
//! isolation.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ai_client::CompletionModel;
use steeple_common::{ChurchRecord, NEEDS_REVIEW_MARKER};
use steeple_enrich::{Enricher, WorkerOptions, WorkerPool};
use steeple_store::{ChurchStore, MemoryChurchStore};

/// Returns a canned response keyed on the church name in the prompt;
/// unmatched names fall through to `default`.
struct ScriptedModel {
    responses: Vec<(&'static str, &'static str)>,
    default: &'static str,
    fail_on: Option<&'static str>,
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, _system: &str, user: &str, _max_tokens: u32) -> Result<String> {
        if let Some(name) = self.fail_on {
            if user.contains(name) {
                bail!("429 rate limited");
            }
        }
        for (name, response) in &self.responses {
            if user.contains(name) {
                return Ok(response.to_string());
            }
        }
        Ok(self.default.to_string())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

const EMPTY_RESPONSE: &str = r#"{"description": "", "whatToExpect": ""}"#;

fn record(name: &str, state_abbr: &str) -> ChurchRecord {
    ChurchRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "Illinois".into(),
        state_abbr: state_abbr.into(),
        zip: None,
        lat: Some(39.78),
        lng: Some(-89.65),
        phone: None,
        email: None,
        website: None,
        denomination: None,
        worship_styles: vec![],
        service_times: vec![],
        has_kids_ministry: false,
        has_youth_group: false,
        has_small_groups: false,
        ai_description: None,
        ai_what_to_expect: None,
        enriched_at: None,
        normalized_address: format!("{} 1 main st", name.to_lowercase()),
        normalized_phone: None,
        source: "test".into(),
        source_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn pool(
    store: Arc<MemoryChurchStore>,
    model: ScriptedModel,
    options: WorkerOptions,
) -> WorkerPool {
    let store: Arc<dyn ChurchStore> = store;
    WorkerPool::new(
        store,
        Arc::new(Enricher::new(Arc::new(model))),
        options,
        Arc::new(AtomicBool::new(false)),
    )
}

fn fast_options() -> WorkerOptions {
    WorkerOptions {
        skip_website: true,
        record_delay: Duration::ZERO,
        error_delay: Duration::ZERO,
        ..Default::default()
    }
}

#[tokio::test]
async fn successful_enrichment_merges_overrides() {
    let store = Arc::new(MemoryChurchStore::new());
    let r = record("First Baptist Church", "IL");
    store.insert(&r).await.unwrap();

    let model = ScriptedModel {
        responses: vec![(
            "First Baptist Church",
            r#"{
                "description": "A Baptist congregation in Springfield.",
                "whatToExpect": "Casual dress.\nService runs an hour.",
                "denomination": "Baptist",
                "worshipStyles": ["traditional"],
                "serviceTimes": [{"day": "Sunday", "time": "10:30 AM"}],
                "hasKidsMinistry": true,
                "hasYouthGroup": null,
                "hasSmallGroups": false
            }"#,
        )],
        default: EMPTY_RESPONSE,
        fail_on: None,
    };

    let stats = pool(store.clone(), model, fast_options()).run().await;

    assert_eq!(stats.enriched, 1);
    assert_eq!(stats.errors, 0);
    let enriched = store.find_by_id(r.id).await.unwrap().unwrap();
    assert!(enriched.is_enriched());
    assert!(!enriched.needs_review());
    assert_eq!(enriched.denomination.as_deref(), Some("Baptist"));
    assert_eq!(enriched.worship_styles, vec!["traditional".to_string()]);
    assert_eq!(enriched.service_times.len(), 1);
    assert!(enriched.has_kids_ministry);
    assert!(!enriched.has_youth_group);
    assert!(enriched.enriched_at.is_some());
}

#[tokio::test]
async fn empty_output_deletes_non_church() {
    let store = Arc::new(MemoryChurchStore::new());
    store.insert(&record("Joe's Plumbing", "IL")).await.unwrap();

    let model = ScriptedModel {
        responses: vec![],
        default: EMPTY_RESPONSE,
        fail_on: None,
    };

    let stats = pool(store.clone(), model, fast_options()).run().await;

    assert_eq!(stats.deleted, 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_output_flags_churchy_name_for_review() {
    let store = Arc::new(MemoryChurchStore::new());
    let r = record("Grace Fellowship Chapel", "IL");
    store.insert(&r).await.unwrap();

    let model = ScriptedModel {
        responses: vec![],
        default: EMPTY_RESPONSE,
        fail_on: None,
    };

    let stats = pool(store.clone(), model, fast_options()).run().await;

    assert_eq!(stats.needs_review, 1);
    assert_eq!(stats.deleted, 0);
    let kept = store.find_by_id(r.id).await.unwrap().unwrap();
    assert_eq!(kept.ai_description.as_deref(), Some(NEEDS_REVIEW_MARKER));
}

#[tokio::test]
async fn model_error_leaves_record_untouched() {
    let store = Arc::new(MemoryChurchStore::new());
    let r = record("Trinity Lutheran Church", "IL");
    store.insert(&r).await.unwrap();

    let model = ScriptedModel {
        responses: vec![],
        default: EMPTY_RESPONSE,
        fail_on: Some("Trinity Lutheran Church"),
    };

    let stats = pool(store.clone(), model, fast_options()).run().await;

    assert_eq!(stats.errors, 1);
    assert_eq!(stats.enriched, 0);
    let untouched = store.find_by_id(r.id).await.unwrap().unwrap();
    assert!(!untouched.is_enriched());
    assert!(untouched.enriched_at.is_none());
}

#[tokio::test]
async fn dry_run_counts_but_writes_nothing() {
    let store = Arc::new(MemoryChurchStore::new());
    store.insert(&record("Joe's Plumbing", "IL")).await.unwrap();
    store
        .insert(&record("Grace Fellowship Chapel", "MN"))
        .await
        .unwrap();

    let model = ScriptedModel {
        responses: vec![],
        default: EMPTY_RESPONSE,
        fail_on: None,
    };
    let options = WorkerOptions {
        dry_run: true,
        ..fast_options()
    };

    let stats = pool(store.clone(), model, options).run().await;

    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.needs_review, 1);
    assert_eq!(store.len(), 2);
    assert!(store.all().iter().all(|r| !r.is_enriched()));
}

#[tokio::test]
async fn records_across_states_are_all_processed() {
    let store = Arc::new(MemoryChurchStore::new());
    for (name, state) in [
        ("Calvary Baptist Church", "IL"),
        ("Hope Methodist Church", "TX"),
        ("Zion Lutheran Church", "CA"),
        ("Bethel Assembly", "NY"),
    ] {
        store.insert(&record(name, state)).await.unwrap();
    }

    let model = ScriptedModel {
        responses: vec![],
        default: r#"{"description": "A local congregation.", "whatToExpect": "Come as you are."}"#,
        fail_on: None,
    };

    let stats = pool(store.clone(), model, fast_options()).run().await;

    assert_eq!(stats.processed, 4);
    assert_eq!(stats.enriched, 4);
    assert!(store.all().iter().all(|r| r.is_enriched()));
}

#[tokio::test]
async fn dry_run_stops_after_one_full_page() {
    // Dry runs remove nothing from the unenriched set, so a full page would
    // be re-pulled verbatim; the worker must leave the shard instead of
    // re-processing it forever.
    let store = Arc::new(MemoryChurchStore::new());
    for i in 0..5 {
        store
            .insert(&record(&format!("Chapel {i}"), "IL"))
            .await
            .unwrap();
    }

    let model = ScriptedModel {
        responses: vec![],
        default: r#"{"description": "d", "whatToExpect": "w"}"#,
        fail_on: None,
    };
    let options = WorkerOptions {
        batch_size: 2,
        workers: 1,
        dry_run: true,
        ..fast_options()
    };

    let stats = pool(store.clone(), model, options).run().await;

    assert_eq!(stats.processed, 2);
    assert_eq!(store.count_unenriched().await.unwrap(), 5);
}

#[tokio::test]
async fn erroring_shard_stops_after_one_full_page() {
    // Every record errors, so nothing leaves the unenriched set; the worker
    // must not spin re-pulling the same page.
    let store = Arc::new(MemoryChurchStore::new());
    for i in 0..4 {
        store
            .insert(&record(&format!("Chapel {i}"), "IL"))
            .await
            .unwrap();
    }

    let model = ScriptedModel {
        responses: vec![],
        default: EMPTY_RESPONSE,
        fail_on: Some("Chapel"),
    };
    let options = WorkerOptions {
        batch_size: 2,
        workers: 1,
        ..fast_options()
    };

    let stats = pool(store.clone(), model, options).run().await;

    assert_eq!(stats.processed, 2);
    assert_eq!(stats.errors, 2);
    assert_eq!(store.count_unenriched().await.unwrap(), 4);
}

#[tokio::test]
async fn limit_caps_processed_records() {
    let store = Arc::new(MemoryChurchStore::new());
    for i in 0..6 {
        store
            .insert(&record(&format!("Church {i}"), "IL"))
            .await
            .unwrap();
    }

    let model = ScriptedModel {
        responses: vec![],
        default: r#"{"description": "d", "whatToExpect": "w"}"#,
        fail_on: None,
    };
    let options = WorkerOptions {
        limit: Some(3),
        workers: 1,
        ..fast_options()
    };

    let stats = pool(store.clone(), model, options).run().await;

    assert_eq!(stats.processed, 3);
    assert_eq!(store.count_unenriched().await.unwrap(), 3);
}
