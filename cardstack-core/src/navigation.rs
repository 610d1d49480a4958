//! Page selection via the `page` query parameter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page shown when no `page` parameter is given.
pub const DEFAULT_PAGE_ID: &str = "1";

const VIEWER_PAGE: &str = "index.html";
const SETTINGS_PAGE: &str = "settings.html";

/// Opaque identifier selecting a set of front/back/QR images.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            Self::default()
        } else {
            Self(id)
        }
    }

    /// Reads the first `page` parameter from a query string.
    ///
    /// A leading `?` is optional. Missing, empty or undecodable values fall
    /// back to [`DEFAULT_PAGE_ID`].
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        query
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key)? == "page").then(|| decode_component(value))
            })
            .next()
            .flatten()
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self(DEFAULT_PAGE_ID.to_string())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

/// Viewer location for a page, used as the redirect target after a save.
pub fn viewer_location(page_id: &PageId) -> String {
    format!("{}?page={}", VIEWER_PAGE, urlencoding::encode(page_id.as_str()))
}

pub fn settings_location(page_id: &PageId) -> String {
    format!(
        "{}?page={}",
        SETTINGS_PAGE,
        urlencoding::encode(page_id.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        assert_eq!(PageId::from_query("").as_str(), "1");
        assert_eq!(PageId::from_query("?other=3").as_str(), "1");
    }

    #[test]
    fn test_empty_value_falls_back() {
        assert_eq!(PageId::from_query("?page=").as_str(), "1");
        assert_eq!(PageId::from_query("page").as_str(), "1");
    }

    #[test]
    fn test_reads_page_param() {
        assert_eq!(PageId::from_query("?page=7").as_str(), "7");
        assert_eq!(PageId::from_query("x=1&page=abc&y=2").as_str(), "abc");
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(PageId::from_query("page=2&page=3").as_str(), "2");
    }

    #[test]
    fn test_decodes_value() {
        assert_eq!(PageId::from_query("?page=my%20card").as_str(), "my card");
        assert_eq!(PageId::from_query("?page=my+card").as_str(), "my card");
    }

    #[test]
    fn test_locations_encode_page_id() {
        assert_eq!(viewer_location(&PageId::new("7")), "index.html?page=7");
        assert_eq!(
            viewer_location(&PageId::new("a b")),
            "index.html?page=a%20b"
        );
        assert_eq!(
            settings_location(&PageId::default()),
            "settings.html?page=1"
        );
    }

    #[test]
    fn test_location_roundtrip() {
        let id = PageId::new("dad & mom");
        let location = viewer_location(&id);
        let query = location.split_once('?').unwrap().1;
        assert_eq!(PageId::from_query(query), id);
    }
}
