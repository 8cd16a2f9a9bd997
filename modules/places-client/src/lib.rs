pub mod error;
pub mod types;

pub use error::{PlacesError, Result};
pub use types::{
    AddressComponent, LatLng, LocalizedText, OpeningHours, Period, Place, TextSearchRequest,
    TextSearchResponse, TimePoint,
};

use std::time::Duration;

const BASE_URL: &str = "https://places.googleapis.com/v1";

/// Field mask for text search. The Places API rejects requests without an
/// explicit field selection, so everything the ingest mapper reads must be
/// listed here.
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.nationalPhoneNumber,places.websiteUri,places.rating,\
places.primaryTypeDisplayName,places.regularOpeningHours,places.addressComponents,\
nextPageToken";

/// Field mask for single-place details (no `places.` prefix).
const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,location,\
nationalPhoneNumber,websiteUri,rating,primaryTypeDisplayName,regularOpeningHours,\
addressComponents";

pub struct PlacesClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Run a text search ("churches in Springfield, IL"). Pagination is via
    /// the opaque `next_page_token` on the response.
    pub async fn text_search(&self, request: &TextSearchRequest) -> Result<TextSearchResponse> {
        let url = format!("{}/places:searchText", self.base_url);

        tracing::debug!(query = %request.text_query, "Places text search");

        let resp = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch a single place by its opaque id.
    pub async fn place_details(&self, place_id: &str) -> Result<Place> {
        let url = format!("{}/places/{}", self.base_url, place_id);

        tracing::debug!(place_id, "Places details");

        let resp = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(resp.json().await?)
    }
}

/// Keep error bodies short enough to log.
fn snippet(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}
