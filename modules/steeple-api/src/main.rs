//! Admin HTTP server: batch imports behind a bearer token.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use steeple_api::{router, AppState};
use steeple_common::Config;
use steeple_ingest::providers::GooglePlacesProvider;
use steeple_store::PgChurchStore;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("steeple_api=info,steeple_ingest=info,steeple_store=info,places_client=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::api_from_env()?;
    config.log_redacted();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = PgChurchStore::new(pool);
    store.migrate().await?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        provider: Arc::new(GooglePlacesProvider::new(
            config.google_places_api_key.as_deref(),
        )),
        admin_api_token: config.admin_api_token.clone(),
    });

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Admin API listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
