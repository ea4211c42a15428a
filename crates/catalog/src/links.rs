use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAP_BASE_URL: &str = "https://map.naver.com/v5/search/";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://search.naver.com/search.naver?query=";

// Unreserved characters plus '/', which query-style quoting leaves intact.
const QUOTE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

// Only addresses in this one district get a neighborhood prefix.
static DISTRICT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+사하구").expect("district pattern compiles"));

/// Builds outbound map and web-search links. Nothing is ever fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    #[serde(default = "default_map_base_url")]
    pub map_base_url: String,
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
}

fn default_map_base_url() -> String {
    DEFAULT_MAP_BASE_URL.to_string()
}

fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            map_base_url: default_map_base_url(),
            search_base_url: default_search_base_url(),
        }
    }
}

impl LinkConfig {
    pub fn map_url(&self, address: &str) -> String {
        format!("{}{}", self.map_base_url, quote(address))
    }

    pub fn search_url(&self, name: &str, address: &str) -> String {
        format!("{}{}", self.search_base_url, quote(&search_term(name, address)))
    }
}

/// `"<district token> <name>"` when the address names the district, else `name`.
pub fn search_term(name: &str, address: &str) -> String {
    match neighborhood(address) {
        Some(token) => format!("{token} {name}").trim().to_string(),
        None => name.to_string(),
    }
}

pub fn neighborhood(address: &str) -> Option<&str> {
    DISTRICT_TOKEN.find(address).map(|m| m.as_str())
}

fn quote(raw: &str) -> String {
    utf8_percent_encode(raw, QUOTE_SET).to_string()
}
