use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Category of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Release,
    Bookmark,
    Favorite,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Label::Release => "release",
            Label::Bookmark => "bookmark",
            Label::Favorite => "favorite",
        };
        f.write_str(name)
    }
}

/// A single feed entry, normalised from any source.
///
/// All sources map their rows into this struct so the rest of the
/// application (merging, sorting, rendering) stays source-agnostic.
///
/// `Item` implements [`Ord`] for reverse-chronological ordering: newer
/// items sort before older ones, and items whose timestamp could not be
/// parsed sort last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,
    pub description: String,
    pub label: Label,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that newer timestamps sort before older ones.
        // `None < Some(_)`, so undated items sink to the bottom.
        other.timestamp.cmp(&self.timestamp)
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.label, self.title, self.description)?;
        match self.timestamp {
            Some(ts) => write!(f, " ({})", ts.to_rfc3339()),
            None => write!(f, " (undated)"),
        }
    }
}

/// One raw row from the tabular-query service: a JSON object keyed by
/// column name. Field names are source-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// String field nested one object deep, e.g. the `label` of an
    /// expanded foreign-key column.
    pub fn nested_str(&self, key: &str, nested: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|v| v.as_object())
            .and_then(|o| o.get(nested))
            .and_then(|v| v.as_str())
    }

    /// Display form of a field that may be a string or a number (row ids
    /// come back as either, depending on the importer).
    pub fn display_field(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Parse a source-provided timestamp.
///
/// Importers disagree on precision and timezone notation, so several
/// shapes are accepted; a naive date-time is taken as UTC. `None` means
/// the value was unparseable and the item will sort after all dated ones.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_item(title: &str, timestamp: Option<DateTime<Utc>>) -> Item {
        Item {
            title: title.to_string(),
            description: String::new(),
            label: Label::Bookmark,
            timestamp,
            link: None,
        }
    }

    #[test]
    fn sort_reverse_chronological() {
        let old = make_item("old", Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()));
        let mid = make_item("mid", Some(Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap()));
        let new = make_item("new", Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));

        let mut items = vec![old, new, mid];
        items.sort();

        assert_eq!(items[0].title, "new");
        assert_eq!(items[1].title, "mid");
        assert_eq!(items[2].title, "old");
    }

    #[test]
    fn undated_items_sort_last() {
        let dated = make_item("dated", Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()));
        let undated = make_item("undated", None);

        let mut items = vec![undated, dated];
        items.sort();

        assert_eq!(items[0].title, "dated");
        assert_eq!(items[1].title, "undated");
    }

    #[test]
    fn parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2023-09-03T17:15:02Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 9, 3, 17, 15, 2).unwrap());
    }

    #[test]
    fn parse_timestamp_with_offset() {
        let ts = parse_timestamp("2023-09-03T19:15:02+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 9, 3, 17, 15, 2).unwrap());
    }

    #[test]
    fn parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp("2023-09-03 17:15:02").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 9, 3, 17, 15, 2).unwrap());
    }

    #[test]
    fn parse_timestamp_fractional_seconds() {
        let ts = parse_timestamp("2023-09-03T17:15:02.123456").unwrap();
        assert_eq!(ts.timestamp(), 1693761302);
    }

    #[test]
    fn parse_timestamp_bare_date() {
        let ts = parse_timestamp("2023-09-03").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 9, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_timestamp_garbage_is_none() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn record_field_accessors() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "name": "hello-world",
            "id": 42,
            "repo": {"value": 7, "label": "octocat/hello-world"},
        }))
        .unwrap();

        assert_eq!(record.str_field("name"), Some("hello-world"));
        assert_eq!(record.str_field("missing"), None);
        assert_eq!(record.nested_str("repo", "label"), Some("octocat/hello-world"));
        assert_eq!(record.display_field("id").as_deref(), Some("42"));
        assert_eq!(record.display_field("name").as_deref(), Some("hello-world"));
    }

    #[test]
    fn item_serializes_lowercase_label() {
        let item = make_item("x", None);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["label"], "bookmark");
    }
}
