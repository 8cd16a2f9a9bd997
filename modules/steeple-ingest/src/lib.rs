pub mod denominations;
pub mod importer;
pub mod normalize;
pub mod provider;
pub mod providers;

pub use importer::{ImportCounts, ImportOptions, Importer, Location, LocationResult};
pub use provider::{ChurchProvider, SearchOutcome, SearchParams};
