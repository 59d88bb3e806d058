use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized record describing one wanted person.
///
/// Only built by `wanted_persons::normalize::normalize_record`, which
/// guarantees a non-empty, trimmed `full_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedPerson {
    pub full_name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub crimes: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub police_station: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Identity of a wanted person: lowercase name plus lowercase alias.
pub type PersonKey = (String, Option<String>);

impl WantedPerson {
    pub fn key(&self) -> PersonKey {
        (
            self.full_name.to_lowercase(),
            self.alias.as_ref().map(|a| a.to_lowercase()),
        )
    }
}

/// The dataset snapshot served by the API and persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedPersonsPayload {
    pub scraped_at: DateTime<Utc>,
    pub source_url: String,
    #[serde(default)]
    pub items: Vec<WantedPerson>,
}
