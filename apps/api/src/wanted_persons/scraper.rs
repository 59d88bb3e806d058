//! Wanted persons scraping: a pluggable source of freshly extracted records.
//!
//! Default: `FirecrawlScraper`, which asks the extraction service to read the
//! configured government page. Carried in `AppState` as
//! `Arc<dyn WantedPersonsSource>` so handlers can run against a stub.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::wanted_person::{WantedPerson, WantedPersonsPayload};
use crate::wanted_persons::extract::{extract_records, extract_schema};
use crate::wanted_persons::firecrawl::{ExtractAgent, ExtractRequest, FirecrawlClient};
use crate::wanted_persons::store::DatasetStore;

const EXTRACT_PROMPT: &str = "Extract the full name, alias, crime(s), image URL, and police \
    station location for each wanted person. Ensure that the full name is included.";
const EXTRACT_AGENT_MODEL: &str = "FIRE-1";

#[async_trait]
pub trait WantedPersonsSource: Send + Sync {
    /// Fetches and normalizes the current list of wanted persons.
    /// Records without a resolvable name are already dropped.
    async fn fetch(&self) -> Result<Vec<WantedPerson>, AppError>;
}

pub struct FirecrawlScraper {
    client: FirecrawlClient,
    source_url: String,
}

impl FirecrawlScraper {
    pub fn new(client: FirecrawlClient, source_url: impl Into<String>) -> Self {
        Self {
            client,
            source_url: source_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FirecrawlClient::new(
                config.firecrawl_api_key.clone(),
                config.firecrawl_base_url.clone(),
            ),
            config.wanted_persons_source_url.clone(),
        )
    }
}

#[async_trait]
impl WantedPersonsSource for FirecrawlScraper {
    async fn fetch(&self) -> Result<Vec<WantedPerson>, AppError> {
        info!(
            "Starting Firecrawl scrape for wanted persons from {}",
            self.source_url
        );

        let request = ExtractRequest {
            urls: vec![self.source_url.as_str()],
            prompt: EXTRACT_PROMPT,
            schema: extract_schema(),
            enable_web_search: true,
            agent: ExtractAgent {
                model: EXTRACT_AGENT_MODEL,
            },
        };
        let data = self.client.extract(&request).await?;

        let records: Vec<WantedPerson> = extract_records(&data).collect();
        info!("Firecrawl returned {} wanted person records", records.len());
        Ok(records)
    }
}

/// Scrapes the source and replaces the persisted snapshot with the result.
pub async fn refresh_dataset(
    source: &dyn WantedPersonsSource,
    store: &DatasetStore,
) -> Result<WantedPersonsPayload, AppError> {
    let records = source.fetch().await?;
    let scraped_at = Utc::now();
    let store = store.clone();
    let payload = tokio::task::spawn_blocking(move || store.upsert(records, scraped_at))
        .await
        .map_err(anyhow::Error::from)??;
    info!(
        "Wanted persons dataset updated at {} ({} records)",
        scraped_at.to_rfc3339(),
        payload.items.len()
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_scraper_without_key_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests(dir.path().join("wanted.json"));
        let scraper = FirecrawlScraper::from_config(&config);
        let err = scraper.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_refresh_normalizes_dedupes_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/extract"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "status": "completed",
                "data": {
                    "data": {
                        "criminals": [
                            {"name": "John Doe", "crimes": "Murder", "location": "Central"},
                            {"alias": "Nameless"},
                            {"full_name": "john doe", "crimes": ["Robbery"], "location": "Central"}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_tests(dir.path().join("wanted.json"));
        config.firecrawl_api_key = Some("fc-test".to_string());
        config.firecrawl_base_url = server.uri();

        let scraper = FirecrawlScraper::from_config(&config);
        let store = DatasetStore::from_config(&config);
        let payload = refresh_dataset(&scraper, &store).await.unwrap();

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].crimes, vec!["Robbery"]);
        assert_eq!(payload.source_url, config.wanted_persons_source_url);
        assert_eq!(store.load().unwrap(), payload);
    }
}
