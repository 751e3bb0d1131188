//! Hospital search links

use url::{form_urlencoded, Url};

const SEARCH_BASE: &str = "https://www.google.com/maps/search/cancer+hospitals+near+";

/// Map search for cancer hospitals near `location`.
///
/// The location is form-urlencoded, so spaces become `+`. Returns `None`
/// for a blank location.
pub fn hospital_search_url(location: &str) -> Option<Url> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    let encoded: String = form_urlencoded::byte_serialize(location.as_bytes()).collect();
    Url::parse(&format!("{}{}", SEARCH_BASE, encoded)).ok()
}
