//! Resolution of the record list inside an extraction response.
//!
//! The extraction service does not return a stable shape. Each
//! [`ExtractionStrategy`] names one key path that may hold the records; the
//! strategies are tried in order and the first path that resolves to a JSON
//! array wins.

use serde_json::Value;
use tracing::debug;

use crate::models::wanted_person::WantedPerson;
use crate::wanted_persons::normalize::normalize_record;

/// One candidate location of the record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    pub path: &'static [&'static str],
    /// An empty array at this path counts as no match.
    pub empty_falls_through: bool,
}

impl ExtractionStrategy {
    /// Returns the records at this strategy's path, or `None` when the path
    /// is missing or does not hold an array.
    pub fn resolve<'a>(&self, raw: &'a Value) -> Option<&'a [Value]> {
        self.path
            .iter()
            .try_fold(raw, |node, key| node.get(*key))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .filter(|records| !(self.empty_falls_through && records.is_empty()))
    }
}

/// Strategies in priority order.
pub const EXTRACTION_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy {
        name: "wanted_persons",
        path: &["wanted_persons"],
        empty_falls_through: false,
    },
    ExtractionStrategy {
        name: "data.wanted_persons",
        path: &["data", "wanted_persons"],
        empty_falls_through: false,
    },
    ExtractionStrategy {
        name: "data.criminals",
        path: &["data", "criminals"],
        empty_falls_through: false,
    },
    ExtractionStrategy {
        name: "criminals",
        path: &["criminals"],
        empty_falls_through: true,
    },
    ExtractionStrategy {
        name: "items",
        path: &["items"],
        empty_falls_through: false,
    },
];

/// Finds the raw record list using the first matching strategy.
/// An unrecognised shape yields an empty slice.
pub fn resolve_record_list(raw: &Value) -> &[Value] {
    EXTRACTION_STRATEGIES
        .iter()
        .find_map(|strategy| {
            strategy.resolve(raw).map(|records| {
                debug!(
                    "Extraction response matched '{}' with {} raw records",
                    strategy.name,
                    records.len()
                );
                records
            })
        })
        .unwrap_or(&[])
}

/// Yields the normalized records of an extraction response, skipping entries
/// without a resolvable name. The iterator is consumed once.
pub fn extract_records(raw: &Value) -> impl Iterator<Item = WantedPerson> + '_ {
    resolve_record_list(raw).iter().filter_map(normalize_record)
}

/// JSON schema sent to the extraction service describing the records we want.
pub fn extract_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "wanted_persons": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "full_name": {"type": "string"},
                        "alias": {"type": ["string", "null"]},
                        "crimes": {"type": ["string", "array"]},
                        "image_url": {"type": ["string", "null"]},
                        "police_station": {"type": ["string", "null"]},
                        "source_url": {"type": ["string", "null"]}
                    }
                }
            }
        },
        "required": ["wanted_persons"]
    })
}
