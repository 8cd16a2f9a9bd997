//! Static denomination vocabulary: a many-to-one map from free-text provider
//! categories to canonical names, plus ordered name-keyword fallback rules.
//! Loaded once as process-wide immutable state.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Free-text category → canonical denomination. Keys are matched
/// case-insensitively against the whole category string.
const CATEGORY_MAP: &[(&str, &str)] = &[
    // Catholic
    ("catholic church", "Catholic"),
    ("roman catholic church", "Catholic"),
    ("catholic cathedral", "Catholic"),
    ("eastern catholic church", "Catholic"),
    ("catholic parish", "Catholic"),
    // Baptist
    ("baptist church", "Baptist"),
    ("southern baptist church", "Southern Baptist"),
    ("southern baptist convention", "Southern Baptist"),
    ("american baptist church", "American Baptist"),
    ("free will baptist church", "Free Will Baptist"),
    ("missionary baptist church", "Missionary Baptist"),
    ("independent baptist church", "Independent Baptist"),
    ("national baptist church", "National Baptist"),
    // Methodist
    ("methodist church", "Methodist"),
    ("united methodist church", "United Methodist"),
    ("free methodist church", "Free Methodist"),
    ("african methodist episcopal church", "African Methodist Episcopal"),
    ("ame church", "African Methodist Episcopal"),
    ("ame zion church", "African Methodist Episcopal Zion"),
    // Lutheran
    ("lutheran church", "Lutheran"),
    ("evangelical lutheran church", "Evangelical Lutheran"),
    ("elca church", "Evangelical Lutheran"),
    ("lutheran church missouri synod", "Lutheran (Missouri Synod)"),
    ("lcms church", "Lutheran (Missouri Synod)"),
    ("wisconsin evangelical lutheran church", "Lutheran (Wisconsin Synod)"),
    // Presbyterian / Reformed
    ("presbyterian church", "Presbyterian"),
    ("presbyterian church usa", "Presbyterian (PCUSA)"),
    ("presbyterian church in america", "Presbyterian (PCA)"),
    ("reformed church", "Reformed"),
    ("christian reformed church", "Christian Reformed"),
    ("dutch reformed church", "Reformed"),
    // Anglican / Episcopal
    ("episcopal church", "Episcopal"),
    ("episcopal cathedral", "Episcopal"),
    ("anglican church", "Anglican"),
    // Pentecostal / charismatic
    ("pentecostal church", "Pentecostal"),
    ("united pentecostal church", "United Pentecostal"),
    ("apostolic church", "Apostolic"),
    ("assembly of god church", "Assemblies of God"),
    ("assemblies of god church", "Assemblies of God"),
    ("foursquare church", "Foursquare"),
    ("foursquare gospel church", "Foursquare"),
    ("church of god", "Church of God"),
    ("church of god in christ", "Church of God in Christ"),
    ("cogic church", "Church of God in Christ"),
    ("vineyard church", "Vineyard"),
    ("calvary chapel", "Calvary Chapel"),
    ("full gospel church", "Full Gospel"),
    // Restorationist
    ("church of christ", "Church of Christ"),
    ("christian church disciples of christ", "Disciples of Christ"),
    ("disciples of christ church", "Disciples of Christ"),
    ("church of the nazarene", "Church of the Nazarene"),
    ("nazarene church", "Church of the Nazarene"),
    // Adventist
    ("seventh day adventist church", "Seventh-day Adventist"),
    ("seventh-day adventist church", "Seventh-day Adventist"),
    ("adventist church", "Seventh-day Adventist"),
    // Orthodox
    ("orthodox church", "Orthodox"),
    ("greek orthodox church", "Greek Orthodox"),
    ("russian orthodox church", "Russian Orthodox"),
    ("eastern orthodox church", "Orthodox"),
    ("coptic orthodox church", "Coptic Orthodox"),
    ("antiochian orthodox church", "Orthodox"),
    ("serbian orthodox church", "Orthodox"),
    ("ethiopian orthodox church", "Orthodox"),
    // Anabaptist / peace churches
    ("mennonite church", "Mennonite"),
    ("amish church", "Amish"),
    ("brethren church", "Brethren"),
    ("church of the brethren", "Brethren"),
    ("quaker meeting house", "Quaker"),
    ("friends meeting house", "Quaker"),
    ("friends church", "Quaker"),
    // Holiness / other Protestant
    ("wesleyan church", "Wesleyan"),
    ("salvation army", "Salvation Army"),
    ("salvation army church", "Salvation Army"),
    ("christian and missionary alliance church", "Christian and Missionary Alliance"),
    ("alliance church", "Christian and Missionary Alliance"),
    ("evangelical free church", "Evangelical Free"),
    ("evangelical covenant church", "Evangelical Covenant"),
    ("covenant church", "Evangelical Covenant"),
    ("congregational church", "Congregational"),
    ("united church of christ", "United Church of Christ"),
    ("ucc church", "United Church of Christ"),
    ("moravian church", "Moravian"),
    ("holiness church", "Holiness"),
    // Non-denominational / community
    ("non-denominational church", "Non-denominational"),
    ("nondenominational church", "Non-denominational"),
    ("non denominational church", "Non-denominational"),
    ("community church", "Non-denominational"),
    ("bible church", "Non-denominational"),
    ("evangelical church", "Evangelical"),
    ("interdenominational church", "Non-denominational"),
    // Other traditions
    ("church of jesus christ of latter-day saints", "Latter-day Saints"),
    ("lds church", "Latter-day Saints"),
    ("mormon church", "Latter-day Saints"),
    ("jehovah's witness kingdom hall", "Jehovah's Witnesses"),
    ("kingdom hall of jehovah's witnesses", "Jehovah's Witnesses"),
    ("christian science church", "Christian Science"),
    ("church of christ scientist", "Christian Science"),
    ("unitarian universalist church", "Unitarian Universalist"),
    ("unitarian church", "Unitarian Universalist"),
    ("unity church", "Unity"),
    ("metaphysical church", "Unity"),
    ("messianic congregation", "Messianic"),
    ("messianic synagogue", "Messianic"),
    ("house church", "Non-denominational"),
    ("korean church", "Non-denominational"),
    ("hispanic church", "Non-denominational"),
    ("chinese church", "Non-denominational"),
];

static CATEGORY_LOOKUP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CATEGORY_MAP.iter().copied().collect());

/// Ordered name-keyword fallback rules, first match wins. More specific
/// phrases come before the substrings they contain ("church of god in
/// christ" before "church of god").
const NAME_RULES: &[(&str, &str)] = &[
    ("catholic", "Catholic"),
    ("southern baptist", "Southern Baptist"),
    ("baptist", "Baptist"),
    ("united methodist", "United Methodist"),
    ("methodist", "Methodist"),
    ("lutheran", "Lutheran"),
    ("presbyterian", "Presbyterian"),
    ("episcopal", "Episcopal"),
    ("anglican", "Anglican"),
    ("assembly of god", "Assemblies of God"),
    ("assemblies of god", "Assemblies of God"),
    ("united church of christ", "United Church of Christ"),
    ("church of god in christ", "Church of God in Christ"),
    ("church of god", "Church of God"),
    ("church of christ", "Church of Christ"),
    ("nazarene", "Church of the Nazarene"),
    ("pentecostal", "Pentecostal"),
    ("apostolic", "Apostolic"),
    ("foursquare", "Foursquare"),
    ("vineyard", "Vineyard"),
    ("calvary chapel", "Calvary Chapel"),
    ("adventist", "Seventh-day Adventist"),
    ("greek orthodox", "Greek Orthodox"),
    ("orthodox", "Orthodox"),
    ("mennonite", "Mennonite"),
    ("brethren", "Brethren"),
    ("quaker", "Quaker"),
    ("friends meeting", "Quaker"),
    ("wesleyan", "Wesleyan"),
    ("salvation army", "Salvation Army"),
    ("evangelical free", "Evangelical Free"),
    ("covenant", "Evangelical Covenant"),
    ("congregational", "Congregational"),
    ("reformed", "Reformed"),
    ("disciples of christ", "Disciples of Christ"),
    ("latter-day saints", "Latter-day Saints"),
    ("latter day saints", "Latter-day Saints"),
    ("kingdom hall", "Jehovah's Witnesses"),
    ("christian science", "Christian Science"),
    ("unitarian", "Unitarian Universalist"),
    ("ame ", "African Methodist Episcopal"),
    ("a.m.e.", "African Methodist Episcopal"),
    ("moravian", "Moravian"),
    ("full gospel", "Full Gospel"),
    ("bible church", "Non-denominational"),
    ("community church", "Non-denominational"),
    ("non-denominational", "Non-denominational"),
    ("nondenominational", "Non-denominational"),
];

/// Map a free-text provider category to a canonical denomination. Unmapped
/// and generic categories ("church", "place of worship") yield None.
pub fn map_denomination(raw_category: &str) -> Option<&'static str> {
    let key = raw_category.trim().to_lowercase();
    CATEGORY_LOOKUP.get(key.as_str()).copied()
}

/// Infer a denomination from the church name. Fallback for records with no
/// usable category; first matching rule wins.
pub fn infer_denomination_from_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    NAME_RULES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, denomination)| *denomination)
}
