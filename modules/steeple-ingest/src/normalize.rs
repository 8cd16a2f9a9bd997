//! Address and phone canonicalization for dedup. Two addresses that
//! normalize identically are treated as the same physical address.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));

/// Street-suffix and direction synonyms, full word → canonical token.
/// Canonical tokens are absent from the key set, which is what makes
/// `normalize_address` idempotent.
static TOKEN_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("street", "st"),
        ("avenue", "ave"),
        ("boulevard", "blvd"),
        ("drive", "dr"),
        ("road", "rd"),
        ("lane", "ln"),
        ("court", "ct"),
        ("circle", "cir"),
        ("place", "pl"),
        ("parkway", "pkwy"),
        ("highway", "hwy"),
        ("terrace", "ter"),
        ("trail", "trl"),
        ("square", "sq"),
        ("suite", "ste"),
        ("apartment", "apt"),
        ("north", "n"),
        ("south", "s"),
        ("east", "e"),
        ("west", "w"),
        ("northeast", "ne"),
        ("northwest", "nw"),
        ("southeast", "se"),
        ("southwest", "sw"),
    ])
});

/// Canonicalize an address for comparison: lowercase, strip punctuation,
/// collapse whitespace, map suffix/direction synonyms. Pure and total.
pub fn normalize_address(street: &str, city: &str, state: &str) -> String {
    let combined = format!("{street} {city} {state}").to_lowercase();
    let stripped = NON_ALNUM_RE.replace_all(&combined, " ");
    stripped
        .split_whitespace()
        .map(|token| *TOKEN_MAP.get(token).unwrap_or(&token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonicalize a phone number to bare 10 digits. Accepts exactly 10 digits,
/// or 11 with a leading country code (stripped). Anything else is not a
/// comparable phone and returns None.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(digits[1..].to_string()),
        _ => None,
    }
}
