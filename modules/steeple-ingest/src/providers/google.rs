use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use places_client::{Place, PlacesClient, TextSearchRequest};
use steeple_common::{state_abbr, state_name, OpenHours, RawChurch};

use crate::denominations::map_denomination;
use crate::provider::{ChurchProvider, SearchOutcome, SearchParams};

const SOURCE_NAME: &str = "google_places";

/// Sunday-first day names matching the Places API 0-indexed `day` field.
const DAY_NAMES: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub struct GooglePlacesProvider {
    client: Option<PlacesClient>,
}

impl GooglePlacesProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            client: api_key.map(PlacesClient::new),
        }
    }

    fn client(&self) -> Result<&PlacesClient> {
        self.client
            .as_ref()
            .ok_or_else(|| anyhow!("GOOGLE_PLACES_API_KEY not configured"))
    }
}

#[async_trait]
impl ChurchProvider for GooglePlacesProvider {
    async fn search_churches(&self, params: &SearchParams) -> Result<SearchOutcome> {
        let state = state_name(&params.state).unwrap_or(params.state.as_str());
        let request = TextSearchRequest {
            text_query: format!("churches in {}, {}", params.city, state),
            page_token: params.page_token.clone(),
            max_result_count: params.max_results.map(|n| n.min(20)),
        };

        let response = self.client()?.text_search(&request).await?;
        let found = response.places.len();

        let records: Vec<RawChurch> = response
            .places
            .iter()
            .filter_map(|p| place_to_raw(p, &params.state))
            .collect();

        debug!(
            city = %params.city,
            found,
            usable = records.len(),
            "Places search mapped"
        );

        Ok(SearchOutcome {
            records,
            next_page_token: response.next_page_token,
            total_estimate: None,
        })
    }

    async fn church_details(&self, source_id: &str) -> Result<Option<RawChurch>> {
        let place = self.client()?.place_details(source_id).await?;
        Ok(place_to_raw(&place, ""))
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

/// Map one Places result into the canonical raw shape. Results without a
/// name or coordinate pair are unusable and filtered, not errors.
fn place_to_raw(place: &Place, fallback_state: &str) -> Option<RawChurch> {
    let name = place.display_name.as_ref()?.text.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let location = place.location?;

    let formatted = place.formatted_address.as_deref().unwrap_or_default();
    // The leading comma-segment of the formatted address is the street line.
    let street = formatted
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut city = String::new();
    let mut state_long = String::new();
    let mut state_short = String::new();
    let mut zip = None;
    for component in &place.address_components {
        if component.types.iter().any(|t| t == "locality") {
            if let Some(text) = component.long_text.as_deref().or(component.short_text.as_deref()) {
                city = text.to_string();
            }
        } else if component
            .types
            .iter()
            .any(|t| t == "administrative_area_level_1")
        {
            state_long = component.long_text.clone().unwrap_or_default();
            state_short = component.short_text.clone().unwrap_or_default();
        } else if component.types.iter().any(|t| t == "postal_code") {
            zip = component
                .long_text
                .clone()
                .or_else(|| component.short_text.clone());
        }
    }

    // Providers may supply only one form of the state; resolve the other
    // through the static table. Fall back to the search parameter.
    let (state, abbr) = resolve_state(&state_long, &state_short, fallback_state)?;

    let hours = place
        .regular_opening_hours
        .as_ref()
        .map(|h| map_hours(&h.periods))
        .unwrap_or_default();

    let denomination = place
        .primary_type_display_name
        .as_ref()
        .and_then(|t| map_denomination(&t.text))
        .map(String::from);

    Some(RawChurch {
        name,
        street,
        city,
        state,
        state_abbr: abbr,
        zip,
        lat: location.latitude,
        lng: location.longitude,
        phone: place.national_phone_number.clone(),
        email: None,
        website: place.website_uri.clone(),
        denomination,
        hours,
        rating: place.rating,
        source: SOURCE_NAME.to_string(),
        source_id: place.id.clone(),
    })
}

fn resolve_state(long: &str, short: &str, fallback: &str) -> Option<(String, String)> {
    for candidate in [long, short, fallback] {
        if candidate.is_empty() {
            continue;
        }
        if let (Some(name), Some(abbr)) = (state_name(candidate), state_abbr(candidate)) {
            return Some((name.to_string(), abbr.to_string()));
        }
    }
    None
}

/// Convert day-indexed opening periods into named-day open/close strings.
/// Periods lacking a close time (24-hour listings) are skipped.
fn map_hours(periods: &[places_client::Period]) -> Vec<OpenHours> {
    periods
        .iter()
        .filter_map(|period| {
            let open = period.open?;
            let close = period.close?;
            let day = *DAY_NAMES.get(open.day? as usize)?;
            Some(OpenHours {
                day: day.to_string(),
                open: format_time(open),
                close: format_time(close),
            })
        })
        .collect()
}

fn format_time(t: places_client::TimePoint) -> String {
    format!("{:02}:{:02}", t.hour.unwrap_or(0), t.minute.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use places_client::{LatLng, LocalizedText, Period, TimePoint};

    fn place(name: Option<&str>, coords: Option<(f64, f64)>) -> Place {
        let json = serde_json::json!({});
        let mut p: Place = serde_json::from_value(json).unwrap();
        p.display_name = name.map(|n| LocalizedText { text: n.into() });
        p.location = coords.map(|(lat, lng)| LatLng {
            latitude: lat,
            longitude: lng,
        });
        p.formatted_address = Some("123 Main St, Springfield, IL 62701, USA".into());
        p
    }

    #[test]
    fn drops_results_without_name_or_coords() {
        assert!(place_to_raw(&place(None, Some((39.78, -89.65))), "IL").is_none());
        assert!(place_to_raw(&place(Some("First Baptist Church"), None), "IL").is_none());
    }

    #[test]
    fn street_is_leading_comma_segment() {
        let raw = place_to_raw(&place(Some("First Baptist Church"), Some((39.78, -89.65))), "IL")
            .unwrap();
        assert_eq!(raw.street, "123 Main St");
        assert_eq!(raw.state, "Illinois");
        assert_eq!(raw.state_abbr, "IL");
    }

    #[test]
    fn state_resolves_from_either_form() {
        assert_eq!(
            resolve_state("Illinois", "", ""),
            Some(("Illinois".into(), "IL".into()))
        );
        assert_eq!(
            resolve_state("", "IL", ""),
            Some(("Illinois".into(), "IL".into()))
        );
        assert_eq!(resolve_state("", "", "Ontario"), None);
    }

    #[test]
    fn hours_skip_periods_without_close() {
        let periods = vec![
            Period {
                open: Some(TimePoint {
                    day: Some(0),
                    hour: Some(9),
                    minute: Some(30),
                }),
                close: Some(TimePoint {
                    day: Some(0),
                    hour: Some(11),
                    minute: Some(0),
                }),
            },
            Period {
                open: Some(TimePoint {
                    day: Some(3),
                    hour: Some(0),
                    minute: Some(0),
                }),
                close: None,
            },
        ];
        let hours = map_hours(&periods);
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].day, "Sunday");
        assert_eq!(hours[0].open, "09:30");
        assert_eq!(hours[0].close, "11:00");
    }
}
