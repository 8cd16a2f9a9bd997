use anyhow::Result;
use async_trait::async_trait;

use steeple_common::RawChurch;

/// One search request against an acquisition provider.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub city: String,
    /// Full name or abbreviation; providers resolve via the state table.
    pub state: String,
    pub radius_km: Option<f64>,
    pub max_results: Option<u32>,
    pub page_token: Option<String>,
}

/// Uniform search result across providers.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub records: Vec<RawChurch>,
    pub next_page_token: Option<String>,
    pub total_estimate: Option<u32>,
}

/// Capability interface over heterogeneous acquisition sources. Providers
/// map source-specific shapes into `RawChurch` and silently drop results
/// lacking a name or coordinates. They never retry; API failures propagate
/// with HTTP status and a body snippet, and the caller decides retry policy.
#[async_trait]
pub trait ChurchProvider: Send + Sync {
    async fn search_churches(&self, params: &SearchParams) -> Result<SearchOutcome>;

    /// Fetch one record by its source-specific id. Optional capability;
    /// providers without per-record lookup return `Ok(None)`.
    async fn church_details(&self, _source_id: &str) -> Result<Option<RawChurch>> {
        Ok(None)
    }

    /// Whether required credentials/inputs are present. Unconfigured
    /// providers must not be called.
    fn is_configured(&self) -> bool;

    fn name(&self) -> &'static str;
}
