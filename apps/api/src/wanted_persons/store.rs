use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::wanted_person::{WantedPerson, WantedPersonsPayload};
use crate::wanted_persons::dedup::dedupe_persons;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The persisted wanted persons snapshot: a single JSON document replaced
/// wholesale on every refresh.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
    source_url: String,
    default_scrape_timestamp: DateTime<Utc>,
}

impl DatasetStore {
    pub fn new(
        path: impl Into<PathBuf>,
        source_url: impl Into<String>,
        default_scrape_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            source_url: source_url.into(),
            default_scrape_timestamp,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.wanted_persons_data_path.clone(),
            config.wanted_persons_source_url.clone(),
            config.default_scrape_timestamp,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current snapshot. A missing file yields an empty payload
    /// stamped with the configured default timestamp and source URL.
    pub fn load(&self) -> Result<WantedPersonsPayload, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Wanted persons dataset not found at {}; returning empty payload",
                    self.path.display()
                );
                return Ok(self.empty_payload());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| {
            warn!(
                "Failed to parse stored wanted persons payload at {}: {source}",
                self.path.display()
            );
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Replaces the persisted snapshot with `payload`.
    ///
    /// Writes to a temporary file next to the target and renames it into
    /// place, so readers never observe a half-written document.
    pub fn save(&self, payload: &WantedPersonsPayload) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(payload).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        info!(
            "Stored {} wanted persons records to {}",
            payload.items.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Deduplicates `items`, wraps them into a fresh payload for the
    /// configured source URL and persists it as the new snapshot.
    pub fn upsert<I>(
        &self,
        items: I,
        scraped_at: DateTime<Utc>,
    ) -> Result<WantedPersonsPayload, StoreError>
    where
        I: IntoIterator<Item = WantedPerson>,
    {
        let payload = WantedPersonsPayload {
            scraped_at,
            source_url: self.source_url.clone(),
            items: dedupe_persons(items),
        };
        self.save(&payload)?;
        Ok(payload)
    }

    fn empty_payload(&self) -> WantedPersonsPayload {
        WantedPersonsPayload {
            scraped_at: self.default_scrape_timestamp,
            source_url: self.source_url.clone(),
            items: Vec::new(),
        }
    }
}
