use std::env;

use anyhow::{bail, Result};
use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // AI providers (at least one required for enrichment)
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    // Acquisition
    pub google_places_api_key: Option<String>,

    // Admin API
    pub admin_api_token: String,
    pub api_host: String,
    pub api_port: u16,
}

impl Config {
    /// Full configuration for the enrichment CLI.
    pub fn enrich_from_env() -> Result<Self> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY").ok(),
            admin_api_token: String::new(),
            api_host: String::new(),
            api_port: 0,
        })
    }

    /// Configuration for import tooling (no AI keys needed).
    pub fn ingest_from_env() -> Result<Self> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            anthropic_api_key: None,
            openai_api_key: None,
            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY").ok(),
            admin_api_token: String::new(),
            api_host: String::new(),
            api_port: 0,
        })
    }

    /// Configuration for the admin HTTP server.
    pub fn api_from_env() -> Result<Self> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            google_places_api_key: env::var("GOOGLE_PLACES_API_KEY").ok(),
            admin_api_token: required_env("ADMIN_API_TOKEN")?,
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("API_PORT must be a number"))?,
        })
    }

    /// Verify that at least one AI provider key is present.
    /// Enrichment cannot start without one.
    pub fn require_ai_provider(&self) -> Result<()> {
        if self.anthropic_api_key.is_none() && self.openai_api_key.is_none() {
            bail!("set ANTHROPIC_API_KEY or OPENAI_API_KEY (at least one AI provider is required)");
        }
        Ok(())
    }

    /// Log which capabilities are configured without printing secrets.
    pub fn log_redacted(&self) {
        info!(
            anthropic = self.anthropic_api_key.is_some(),
            openai = self.openai_api_key.is_some(),
            google_places = self.google_places_api_key.is_some(),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("{key} environment variable is required"))
}
