//! Normalization of raw extraction records into canonical [`WantedPerson`]s.
//!
//! The extraction service names fields inconsistently between runs, so every
//! canonical field is resolved from an ordered list of candidate keys.

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::models::wanted_person::WantedPerson;

const NAME_KEYS: &[&str] = &["full_name", "name"];
const IMAGE_URL_KEYS: &[&str] = &["image_url", "imageurl"];
const STATION_KEYS: &[&str] = &["police_station", "location"];
const ALIAS_KEYS: &[&str] = &["alias"];
const SOURCE_URL_KEYS: &[&str] = &["source_url"];

/// Converts one raw record into a [`WantedPerson`].
///
/// Returns `None` when no name can be resolved. That is a data-quality
/// filter, not an error.
pub fn normalize_record(raw: &Value) -> Option<WantedPerson> {
    let record = raw.as_object()?;
    let field = |keys: &[&str]| keys.iter().find_map(|k| text_field(record.get(*k)));

    let full_name = field(NAME_KEYS)?;

    Some(WantedPerson {
        full_name,
        alias: field(ALIAS_KEYS),
        crimes: normalize_crimes(record.get("crimes")),
        image_url: field(IMAGE_URL_KEYS).and_then(absolute_url),
        police_station: field(STATION_KEYS),
        source_url: field(SOURCE_URL_KEYS).and_then(absolute_url),
    })
}

/// Normalizes the loosely typed `crimes` field into an ordered list of labels.
///
/// A single string is split on commas, with `" and "` treated as a comma:
/// `"Murder and Robbery, Fraud"` becomes `["Murder", "Robbery", "Fraud"]`.
pub fn normalize_crimes(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| stringify(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .replace(" and ", ",")
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect(),
        Some(other) => vec![stringify(other)],
    }
}

/// Resolves a text field; missing, null, non-string and blank values count as absent.
fn text_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keeps only absolute http(s) URLs.
fn absolute_url(raw: String) -> Option<String> {
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw),
        _ => {
            debug!("Dropping non-absolute URL from wanted person record: {raw}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_crimes_single_string() {
        assert_eq!(normalize_crimes(Some(&json!("Murder"))), vec!["Murder"]);
    }

    #[test]
    fn test_normalize_crimes_comma_and_conjunction() {
        assert_eq!(
            normalize_crimes(Some(&json!("Murder and Robbery, Fraud"))),
            vec!["Murder", "Robbery", "Fraud"]
        );
    }

    #[test]
    fn test_normalize_crimes_drops_empty_parts() {
        assert_eq!(
            normalize_crimes(Some(&json!(" Murder ,, ,Robbery"))),
            vec!["Murder", "Robbery"]
        );
    }

    #[test]
    fn test_normalize_crimes_list_is_trimmed() {
        assert_eq!(
            normalize_crimes(Some(&json!([" Murder", "", "Robbery ", 42]))),
            vec!["Murder", "Robbery", "42"]
        );
    }

    #[test]
    fn test_normalize_crimes_empty_and_absent() {
        assert!(normalize_crimes(Some(&json!([]))).is_empty());
        assert!(normalize_crimes(None).is_empty());
        assert!(normalize_crimes(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_normalize_crimes_other_scalar_is_wrapped() {
        assert_eq!(normalize_crimes(Some(&json!(7))), vec!["7"]);
        assert_eq!(normalize_crimes(Some(&json!(true))), vec!["true"]);
    }

    #[test]
    fn test_normalize_record_full_data() {
        let raw = json!({
            "full_name": "John Doe",
            "alias": "Johnny",
            "crimes": "Murder",
            "image_url": "https://example.com/image.jpg",
            "police_station": "Kingston Central Police",
            "source_url": "https://example.com/source"
        });
        let person = normalize_record(&raw).unwrap();
        assert_eq!(person.full_name, "John Doe");
        assert_eq!(person.alias.as_deref(), Some("Johnny"));
        assert_eq!(person.crimes, vec!["Murder"]);
        assert_eq!(
            person.image_url.as_deref(),
            Some("https://example.com/image.jpg")
        );
        assert_eq!(
            person.police_station.as_deref(),
            Some("Kingston Central Police")
        );
        assert_eq!(
            person.source_url.as_deref(),
            Some("https://example.com/source")
        );
    }

    #[test]
    fn test_normalize_record_alternative_field_names() {
        let raw = json!({
            "name": "John Doe",
            "imageurl": "http://x/y.jpg",
            "location": "Central"
        });
        let person = normalize_record(&raw).unwrap();
        assert_eq!(person.full_name, "John Doe");
        assert_eq!(person.image_url.as_deref(), Some("http://x/y.jpg"));
        assert_eq!(person.police_station.as_deref(), Some("Central"));
        assert!(person.crimes.is_empty());
    }

    #[test]
    fn test_normalize_record_primary_key_wins_over_fallback() {
        let raw = json!({"full_name": "Jane Smith", "name": "J. Smith"});
        assert_eq!(normalize_record(&raw).unwrap().full_name, "Jane Smith");
    }

    #[test]
    fn test_normalize_record_blank_primary_falls_back() {
        let raw = json!({"full_name": "", "name": "Bob Johnson", "police_station": null, "location": "St. James"});
        let person = normalize_record(&raw).unwrap();
        assert_eq!(person.full_name, "Bob Johnson");
        assert_eq!(person.police_station.as_deref(), Some("St. James"));
    }

    #[test]
    fn test_normalize_record_without_name_is_dropped() {
        assert!(normalize_record(&json!({"alias": "X"})).is_none());
        assert!(normalize_record(&json!({"full_name": "   "})).is_none());
        assert!(normalize_record(&json!("John Doe")).is_none());
    }

    #[test]
    fn test_normalize_record_empty_alias_is_absent() {
        let person = normalize_record(&json!({"full_name": "John Doe", "alias": ""})).unwrap();
        assert_eq!(person.alias, None);
    }

    #[test]
    fn test_normalize_record_drops_relative_urls() {
        let raw = json!({"full_name": "John Doe", "image_url": "/images/john.jpg"});
        assert_eq!(normalize_record(&raw).unwrap().image_url, None);
    }
}
