use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::CardSide;

/// Stored image URLs for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub qr: Option<String>,
    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "deserialize_timestamp"
    )]
    pub updated_at: DateTime<Utc>,
}

/// Accepts RFC 3339 strings or epoch milliseconds; anything else is the epoch.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

impl PageRecord {
    /// Creates a record stamped with the current time.
    pub fn new(front: Option<String>, back: Option<String>, qr: Option<String>) -> Self {
        Self {
            front,
            back,
            qr,
            updated_at: Utc::now(),
        }
    }

    pub fn url(&self, side: CardSide) -> Option<&str> {
        match side {
            CardSide::Front => self.front.as_deref(),
            CardSide::Back => self.back.as_deref(),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "front": self.front,
            "back": self.back,
            "qr": self.qr,
            "updatedAt": self.updated_at,
        })
    }
}

/// The single remote document holding every page's record.
///
/// Pages are held as raw JSON and only parsed on access, so records this
/// client cannot read and fields other than `pages` survive a
/// read-modify-write unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub pages: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Document {
    /// Parses the record for `page_id`; an unreadable record counts as absent.
    pub fn page(&self, page_id: &str) -> Option<PageRecord> {
        let raw = self.pages.get(page_id)?;
        match PageRecord::deserialize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(page = page_id, "Ignoring unreadable page record: {}", e);
                None
            }
        }
    }

    /// Replaces the record for `page_id` wholesale.
    pub fn set_page(&mut self, page_id: impl Into<String>, record: PageRecord) {
        self.pages.insert(page_id.into(), record.to_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_serializes_to_empty_pages() {
        let doc = Document::default();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"pages":{}}"#);
    }

    #[test]
    fn test_record_uses_camel_case_timestamp() {
        let record = PageRecord::new(Some("https://i.example/f.jpg".to_string()), None, None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["front"], "https://i.example/f.jpg");
        assert!(json["back"].is_null());
    }

    #[test]
    fn test_parse_document_with_nulls() {
        let json = r#"{
            "pages": {
                "1": {"front": "a", "back": null, "qr": null, "updatedAt": "2025-12-27T17:55:50.000Z"}
            }
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let record = doc.page("1").unwrap();
        assert_eq!(record.url(CardSide::Front), Some("a"));
        assert_eq!(record.url(CardSide::Back), None);
        assert!(doc.page("2").is_none());
    }

    #[test]
    fn test_lenient_timestamps() {
        let json = r#"{
            "pages": {
                "1": {"front": "a", "updatedAt": null},
                "2": {"front": "b", "updatedAt": 1735322150000},
                "3": {"front": "c", "updatedAt": "yesterday"}
            }
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.page("1").unwrap().updated_at, DateTime::<Utc>::default());
        assert_eq!(
            doc.page("2").unwrap().updated_at,
            DateTime::from_timestamp_millis(1_735_322_150_000).unwrap()
        );
        assert_eq!(doc.page("3").unwrap().url(CardSide::Front), Some("c"));
    }

    #[test]
    fn test_unreadable_page_is_absent_but_kept() {
        let json = r#"{"pages": {"1": {"front": 5}, "2": "junk"}}"#;
        let mut doc: Document = serde_json::from_str(json).unwrap();
        assert!(doc.page("1").is_none());
        assert!(doc.page("2").is_none());

        doc.set_page("3", PageRecord::new(Some("x".to_string()), None, None));
        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["pages"]["1"], serde_json::json!({"front": 5}));
        assert_eq!(out["pages"]["2"], "junk");
        assert_eq!(out["pages"]["3"]["front"], "x");
    }

    #[test]
    fn test_missing_pages_defaults_to_empty() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_extra_fields_preserved() {
        let json = r#"{"pages": {}, "owner": "someone"}"#;
        let mut doc: Document = serde_json::from_str(json).unwrap();
        doc.set_page("3", PageRecord::new(None, None, Some("q".to_string())));

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["owner"], "someone");
        assert_eq!(out["pages"]["3"]["qr"], "q");
    }
}
