pub mod enricher;
pub mod fetcher;
pub mod heuristics;
pub mod worker;

pub use enricher::{EnrichError, Enricher, EnrichmentContext, EnrichmentResult};
pub use fetcher::{FetchedSite, SiteFetcher};
pub use worker::{RunStats, WorkerOptions, WorkerPool};
