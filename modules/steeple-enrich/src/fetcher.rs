//! Best-effort retrieval of a church's website: cleaned text for the
//! enrichment prompt plus a contact email scraped from the raw HTML.
//! Every failure degrades to "no content"; this is never a hard error.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{debug, warn};

use ai_client::util::truncate_to_char_boundary;

/// Byte bound on the website text fed into the enrichment prompt.
const MAX_CONTENT_BYTES: usize = 15_000;

const FETCH_TIMEOUT: Duration = Duration::from_secs(7);

const USER_AGENT: &str = "SteepleBot/1.0 (church directory enrichment)";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("valid regex")
});

/// Local parts that mark a non-contact mailbox.
const BLOCKED_LOCAL_PARTS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "do-not-reply",
    "mailer-daemon",
    "postmaster",
    "abuse",
    "webmaster",
    "example",
    "test",
    "user",
    "name",
    "your",
    "youremail",
    "email@example",
];

/// Domains that belong to platforms/CDNs, not the church.
const BLOCKED_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "domain.com",
    "yourdomain.com",
    "sentry.io",
    "wixpress.com",
    "sentry.wixpress.com",
    "godaddy.com",
    "placeholder.com",
    "squarespace.com",
];

/// Preferred local parts, in order. A match here wins over document order.
const PRIORITY_LOCAL_PARTS: &[&str] = &[
    "info", "contact", "office", "admin", "hello", "church", "mail", "email", "general",
];

#[derive(Debug, Clone, Default)]
pub struct FetchedSite {
    pub content: Option<String>,
    pub email: Option<String>,
}

pub struct SiteFetcher {
    client: reqwest::Client,
}

impl Default for SiteFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    /// Fetch and clean one page. Non-success statuses, timeouts, and network
    /// errors all return an empty `FetchedSite`.
    pub async fn fetch(&self, url: &str) -> FetchedSite {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(url, error = %e, "Website fetch failed");
                return FetchedSite::default();
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "Website returned non-success status");
            return FetchedSite::default();
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "Failed to read website body");
                return FetchedSite::default();
            }
        };

        // Email scan runs on raw HTML: mailto links and footer markup are
        // stripped by the readability pass below.
        let email = extract_contact_email(&html);
        let content = html_to_text(url, &html);

        FetchedSite { content, email }
    }
}

/// Strip boilerplate/tags and bound the result. Returns None when nothing
/// readable survives.
fn html_to_text(url: &str, html: &str) -> Option<String> {
    let parsed_url = url::Url::parse(url).ok();
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Text,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    let text = transform_content_input(input, &config);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_to_char_boundary(trimmed, MAX_CONTENT_BYTES).to_string())
}

/// Pick the most likely contact email out of raw HTML. Deduplicates in
/// document order, drops platform/placeholder/asset matches, then prefers
/// priority local parts before falling back to the first survivor.
pub fn extract_contact_email(html: &str) -> Option<String> {
    let mut seen = std::collections::HashSet::new();
    let candidates: Vec<String> = EMAIL_RE
        .find_iter(html)
        .filter_map(|m| {
            let email = m.as_str().to_lowercase();
            seen.insert(email.clone()).then_some(email)
        })
        .filter(|email| is_plausible_contact(email))
        .collect();

    for priority in PRIORITY_LOCAL_PARTS {
        if let Some(hit) = candidates
            .iter()
            .find(|email| email.split('@').next() == Some(*priority))
        {
            return Some(hit.clone());
        }
    }

    candidates.into_iter().next()
}

fn is_plausible_contact(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    // Asset filenames picked up by the regex ("logo@2x.png")
    const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".css", ".js"];
    if ASSET_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return false;
    }

    if BLOCKED_DOMAINS.iter().any(|d| domain == *d || domain.ends_with(&format!(".{d}"))) {
        return false;
    }

    !BLOCKED_LOCAL_PARTS.contains(&local)
}
