use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use steeple_common::{state_abbr, state_name, RawChurch};

use crate::provider::{ChurchProvider, SearchOutcome, SearchParams};

const SOURCE_NAME: &str = "csv_backfill";

/// Expected header: name,street,city,state,zip,lat,lng,phone,email,website,denomination
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    street: String,
    city: String,
    state: String,
    #[serde(default)]
    zip: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    denomination: Option<String>,
}

/// Backfill provider reading a local CSV export. Not paginated; one search
/// returns every usable row in the file.
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and map every row. Rows missing a name, coordinates, or a
    /// resolvable state are skipped with a warning, matching the silent
    /// filtering contract of the provider interface.
    pub fn read_all(&self) -> Result<Vec<RawChurch>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open CSV file {}", self.path.display()))?;

        let mut records = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!(line = line + 2, error = %e, "Skipping malformed CSV row");
                    continue;
                }
            };
            match row_to_raw(row) {
                Some(raw) => records.push(raw),
                None => warn!(line = line + 2, "Skipping unusable CSV row"),
            }
        }
        Ok(records)
    }
}

fn row_to_raw(row: CsvRow) -> Option<RawChurch> {
    let name = row.name.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let (lat, lng) = (row.lat?, row.lng?);
    let state = state_name(&row.state)?.to_string();
    let abbr = state_abbr(&row.state)?.to_string();

    Some(RawChurch {
        name,
        street: row.street.trim().to_string(),
        city: row.city.trim().to_string(),
        state,
        state_abbr: abbr,
        zip: row.zip.filter(|z| !z.is_empty()),
        lat,
        lng,
        phone: row.phone.filter(|p| !p.is_empty()),
        email: row.email.filter(|e| !e.is_empty()),
        website: row.website.filter(|w| !w.is_empty()),
        denomination: row.denomination.filter(|d| !d.is_empty()),
        hours: Vec::new(),
        rating: None,
        source: SOURCE_NAME.to_string(),
        source_id: None,
    })
}

#[async_trait]
impl ChurchProvider for CsvProvider {
    async fn search_churches(&self, _params: &SearchParams) -> Result<SearchOutcome> {
        let records = self.read_all()?;
        let total = records.len() as u32;
        Ok(SearchOutcome {
            records,
            next_page_token: None,
            total_estimate: Some(total),
        })
    }

    fn is_configured(&self) -> bool {
        self.path.exists()
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}
