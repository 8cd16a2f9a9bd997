pub mod auth;
pub mod import;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use steeple_ingest::ChurchProvider;
use steeple_store::ChurchStore;

pub struct AppState {
    pub store: Arc<dyn ChurchStore>,
    pub provider: Arc<dyn ChurchProvider>,
    pub admin_api_token: String,
}

impl AppState {
    pub fn provider_configured(&self) -> bool {
        self.provider.is_configured()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/admin/import-batch", post(import::import_batch))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
