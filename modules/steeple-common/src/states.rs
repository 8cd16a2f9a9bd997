//! Static two-way US state lookup table. Providers deliver either a full
//! state name or a two-letter code depending on the source; both directions
//! resolve through this table. The abbreviation list doubles as the shard
//! set for the enrichment worker pool.

/// (full name, USPS abbreviation), alphabetical by name.
pub const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Resolve a full state name to its abbreviation. Case-insensitive.
pub fn state_abbr(name: &str) -> Option<&'static str> {
    let name = name.trim();
    US_STATES
        .iter()
        .find(|(n, a)| n.eq_ignore_ascii_case(name) || a.eq_ignore_ascii_case(name))
        .map(|(_, a)| *a)
}

/// Resolve an abbreviation (or full name) to the full state name.
/// Case-insensitive.
pub fn state_name(abbr: &str) -> Option<&'static str> {
    let abbr = abbr.trim();
    US_STATES
        .iter()
        .find(|(n, a)| a.eq_ignore_ascii_case(abbr) || n.eq_ignore_ascii_case(abbr))
        .map(|(n, _)| *n)
}

/// All shard keys, in table order. The worker pool distributes these
/// round-robin; the order itself carries no meaning.
pub fn all_state_abbrs() -> Vec<&'static str> {
    US_STATES.iter().map(|(_, a)| *a).collect()
}
