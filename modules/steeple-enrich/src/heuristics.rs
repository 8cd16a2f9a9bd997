//! Name-based guardrails for the delete decision. When the model returns
//! empty output, a record whose name still reads like a church is flagged
//! for review instead of deleted.

/// Substrings (case-insensitive) that mark a name as plausibly a place of
/// worship. Deliberately broad: a false "looks like a church" only costs a
/// review flag, while a false "doesn't" deletes the record.
const CHURCH_KEYWORDS: &[&str] = &[
    "church",
    "chapel",
    "cathedral",
    "parish",
    "ministry",
    "ministries",
    "fellowship",
    "congregation",
    "tabernacle",
    "temple",
    "assembly",
    "mission",
    "worship",
    "sanctuary",
    "basilica",
    "christian",
    "catholic",
    "baptist",
    "methodist",
    "lutheran",
    "presbyterian",
    "pentecostal",
    "episcopal",
    "orthodox",
    "adventist",
    "nazarene",
    "mennonite",
    "apostolic",
    "evangelical",
    "gospel",
    "faith",
    "grace",
    "calvary",
    "trinity",
    "bethel",
    "zion",
    "saint ",
    "st. ",
    "st ",
    "iglesia",
    "capilla",
];

pub fn looks_like_church(name: &str) -> bool {
    let lowered = name.to_lowercase();
    CHURCH_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
