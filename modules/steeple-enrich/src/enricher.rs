//! Single-call AI enrichment: one prompt per church, one JSON object back.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use ai_client::util::{extract_json_object, strip_code_blocks};
use ai_client::CompletionModel;
use steeple_common::{ServiceTime, WORSHIP_STYLES};

const MAX_TOKENS: u32 = 1500;

const SYSTEM_PROMPT: &str = r#"You write factual church-directory entries. Given a church's name, location, and (when available) text from its website, respond with ONE JSON object and nothing else:

{
  "description": "2-3 sentence factual description of the church",
  "whatToExpect": "Visitor guide with sections separated by line breaks: what to wear, the service format, and tips for first-time visitors",
  "denomination": "canonical denomination name, or null",
  "worshipStyles": ["traditional", "contemporary", "blended", "charismatic", "liturgical", "gospel"] (pick only what applies, or null),
  "serviceTimes": [{"day": "Sunday", "time": "10:30 AM", "label": "Worship Service"}] (or null),
  "hasKidsMinistry": true/false/null,
  "hasYouthGroup": true/false/null,
  "hasSmallGroups": true/false/null
}

Rules:
- Base claims on the provided website text. Never invent service times, programs, or beliefs.
- When you are not sure about a field, return null for it rather than guessing.
- If you cannot tell what this organization is, return empty strings for description and whatToExpect."#;

// =============================================================================
// Context & result
// =============================================================================

/// Everything the prompt knows about one church.
#[derive(Debug, Clone)]
pub struct EnrichmentContext<'a> {
    pub name: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub denomination: Option<&'a str>,
    pub website: Option<&'a str>,
    pub website_content: Option<&'a str>,
}

/// Validated enrichment output. Empty `description`/`what_to_expect` mean
/// the model declined; the worker decides what that implies for the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentResult {
    pub description: String,
    pub what_to_expect: String,
    pub denomination: Option<String>,
    pub worship_styles: Option<Vec<String>>,
    pub service_times: Option<Vec<ServiceTime>>,
    pub has_kids_ministry: Option<bool>,
    pub has_youth_group: Option<bool>,
    pub has_small_groups: Option<bool>,
}

impl EnrichmentResult {
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty() || self.what_to_expect.trim().is_empty()
    }
}

/// "No JSON found" and "JSON present but wrong shape" are distinct failure
/// modes and are reported as such.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("no JSON object in model response")]
    NoJson,

    #[error("model JSON has the wrong shape: {0}")]
    BadShape(String),

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}

// =============================================================================
// Enricher
// =============================================================================

pub struct Enricher {
    model: Arc<dyn CompletionModel>,
}

impl Enricher {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// One completion call for one record. Missing/unparseable JSON is a
    /// hard failure for that record; wrong-typed optional fields are
    /// coerced to unknown instead.
    pub async fn generate(
        &self,
        context: &EnrichmentContext<'_>,
    ) -> Result<EnrichmentResult, EnrichError> {
        let user_prompt = build_user_prompt(context);

        debug!(name = context.name, model = self.model.name(), "Enrichment request");
        let response = self.model.complete(SYSTEM_PROMPT, &user_prompt, MAX_TOKENS).await?;

        parse_response(&response)
    }
}

fn build_user_prompt(context: &EnrichmentContext<'_>) -> String {
    let mut prompt = format!(
        "Church: {}\nLocation: {}, {}\n",
        context.name, context.city, context.state
    );
    if let Some(denomination) = context.denomination {
        prompt.push_str(&format!("Known denomination: {denomination}\n"));
    }
    if let Some(website) = context.website {
        prompt.push_str(&format!("Website: {website}\n"));
    }
    match context.website_content {
        Some(content) if !content.trim().is_empty() => {
            prompt.push_str(&format!("\nWebsite text:\n{content}\n"));
        }
        _ => prompt.push_str("\nNo website text available.\n"),
    }
    prompt
}

/// Extract and coerce the embedded JSON object.
fn parse_response(response: &str) -> Result<EnrichmentResult, EnrichError> {
    let cleaned = strip_code_blocks(response);
    let json = extract_json_object(cleaned).ok_or(EnrichError::NoJson)?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| EnrichError::BadShape(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| EnrichError::BadShape("top level is not an object".into()))?;

    Ok(EnrichmentResult {
        description: string_field(obj, "description"),
        what_to_expect: string_field(obj, "whatToExpect"),
        denomination: obj
            .get("denomination")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        worship_styles: worship_styles_field(obj.get("worshipStyles")),
        service_times: service_times_field(obj.get("serviceTimes")),
        has_kids_ministry: obj.get("hasKidsMinistry").and_then(Value::as_bool),
        has_youth_group: obj.get("hasYouthGroup").and_then(Value::as_bool),
        has_small_groups: obj.get("hasSmallGroups").and_then(Value::as_bool),
    })
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Keep only styles from the fixed vocabulary; an empty result is "unknown".
fn worship_styles_field(value: Option<&Value>) -> Option<Vec<String>> {
    let styles: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| WORSHIP_STYLES.contains(&s.as_str()))
        .collect();
    (!styles.is_empty()).then_some(styles)
}

fn service_times_field(value: Option<&Value>) -> Option<Vec<ServiceTime>> {
    let times: Vec<ServiceTime> = value?
        .as_array()?
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let day = obj.get("day")?.as_str()?.trim();
            let time = obj.get("time")?.as_str()?.trim();
            if day.is_empty() || time.is_empty() {
                return None;
            }
            Some(ServiceTime {
                day: day.to_string(),
                time: time.to_string(),
                label: obj
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            })
        })
        .collect();
    (!times.is_empty()).then_some(times)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_response() {
        let response = r#"Here is the entry:
        {
          "description": "A historic Baptist congregation in downtown Springfield.",
          "whatToExpect": "Dress is casual.\nServices run about 75 minutes.\nGreeters can help first-timers find a seat.",
          "denomination": "Baptist",
          "worshipStyles": ["traditional", "gospel"],
          "serviceTimes": [{"day": "Sunday", "time": "10:30 AM", "label": "Worship"}],
          "hasKidsMinistry": true,
          "hasYouthGroup": false,
          "hasSmallGroups": null
        }"#;

        let result = parse_response(response).unwrap();
        assert!(!result.is_empty());
        assert_eq!(result.denomination.as_deref(), Some("Baptist"));
        assert_eq!(
            result.worship_styles,
            Some(vec!["traditional".to_string(), "gospel".to_string()])
        );
        assert_eq!(result.service_times.as_ref().unwrap()[0].day, "Sunday");
        assert_eq!(result.has_kids_ministry, Some(true));
        assert_eq!(result.has_youth_group, Some(false));
        assert_eq!(result.has_small_groups, None);
    }

    #[test]
    fn empty_strings_mean_declined() {
        let result = parse_response(r#"{"description": "", "whatToExpect": ""}"#).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn missing_json_is_nojson() {
        let err = parse_response("I can't help with that.").unwrap_err();
        assert!(matches!(err, EnrichError::NoJson));
    }

    #[test]
    fn malformed_json_is_badshape() {
        let err = parse_response(r#"{"description": "ok", }"#).unwrap_err();
        assert!(matches!(err, EnrichError::BadShape(_)));
    }

    #[test]
    fn wrong_typed_fields_coerce_to_unknown() {
        let response = r#"{
            "description": "Fine.",
            "whatToExpect": "Also fine.",
            "hasKidsMinistry": "yes",
            "worshipStyles": "contemporary",
            "serviceTimes": {"day": "Sunday"}
        }"#;
        let result = parse_response(response).unwrap();
        assert_eq!(result.has_kids_ministry, None);
        assert_eq!(result.worship_styles, None);
        assert_eq!(result.service_times, None);
    }

    #[test]
    fn empty_arrays_become_unknown() {
        let response =
            r#"{"description": "d", "whatToExpect": "w", "worshipStyles": [], "serviceTimes": []}"#;
        let result = parse_response(response).unwrap();
        assert_eq!(result.worship_styles, None);
        assert_eq!(result.service_times, None);
    }

    #[test]
    fn unknown_styles_are_dropped() {
        let response =
            r#"{"description": "d", "whatToExpect": "w", "worshipStyles": ["Contemporary", "heavy metal"]}"#;
        let result = parse_response(response).unwrap();
        assert_eq!(result.worship_styles, Some(vec!["contemporary".to_string()]));
    }

    #[test]
    fn code_fenced_json_still_parses() {
        let response = "```json\n{\"description\": \"d\", \"whatToExpect\": \"w\"}\n```";
        let result = parse_response(response).unwrap();
        assert_eq!(result.description, "d");
    }

    #[test]
    fn prompt_includes_website_text_when_present() {
        let ctx = EnrichmentContext {
            name: "Grace Chapel",
            city: "Austin",
            state: "Texas",
            denomination: Some("Non-denominational"),
            website: Some("https://grace.example.org"),
            website_content: Some("Join us Sundays at 9 and 11."),
        };
        let prompt = build_user_prompt(&ctx);
        assert!(prompt.contains("Grace Chapel"));
        assert!(prompt.contains("Known denomination: Non-denominational"));
        assert!(prompt.contains("Join us Sundays"));

        let bare = EnrichmentContext {
            website_content: None,
            ..ctx
        };
        assert!(build_user_prompt(&bare).contains("No website text available"));
    }
}
