//! POST /api/admin/import-batch: run a multi-location Places import and
//! report per-location results.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use steeple_ingest::{ImportCounts, ImportOptions, Importer, Location, LocationResult};

use crate::auth::AdminAuth;
use crate::AppState;

const MAX_LOCATIONS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ImportBatchRequest {
    pub locations: Vec<Location>,
    #[serde(default)]
    pub skip_duplicates: Option<bool>,
    #[serde(default)]
    pub max_results_per_location: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ImportBatchResponse {
    pub results: Vec<LocationResult>,
    pub totals: ImportCounts,
}

pub async fn import_batch(
    _auth: AdminAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportBatchRequest>,
) -> Response {
    if let Err(message) = validate(&request) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response();
    }

    if !state.provider_configured() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "GOOGLE_PLACES_API_KEY is not configured"})),
        )
            .into_response();
    }

    info!(locations = request.locations.len(), "Admin batch import requested");

    let importer = Importer::new(
        state.store.clone(),
        ImportOptions {
            skip_duplicates: request.skip_duplicates.unwrap_or(true),
            max_results_per_location: request.max_results_per_location,
            ..Default::default()
        },
    );

    let results = importer
        .import_locations(state.provider.as_ref(), &request.locations)
        .await;

    let mut totals = ImportCounts::default();
    for result in &results {
        totals.add(result.counts);
    }
    info!(%totals, "Admin batch import finished");

    Json(ImportBatchResponse { results, totals }).into_response()
}

fn validate(request: &ImportBatchRequest) -> Result<(), String> {
    if request.locations.is_empty() {
        return Err("at least one location is required".to_string());
    }
    if request.locations.len() > MAX_LOCATIONS {
        return Err(format!("at most {MAX_LOCATIONS} locations per request"));
    }
    Ok(())
}
