use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

const DEFAULT_SOURCE_URL: &str = "https://jcf.gov.jm/crime/wanted-persons/";
const DEFAULT_DATA_PATH: &str = "data/wanted_persons.json";
const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_REPORT_SENDER: &str = "Crime Intelligence <cyberintelligence@nightshadeai.xyz>";

/// Application configuration loaded from environment variables.
///
/// Built once in `main` and shared through `AppState`. Keys for external
/// collaborators are optional here; the component that needs one reports a
/// configuration error when it is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_base_url: String,
    pub wanted_persons_source_url: String,
    pub wanted_persons_data_path: PathBuf,
    /// Timestamp reported for the empty dataset served before the first scrape.
    pub default_scrape_timestamp: DateTime<Utc>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub convex_deployment_url: Option<String>,
    pub resend_api_key: Option<String>,
    /// Comma separated list of report recipients.
    pub recipients: Option<String>,
    pub report_sender: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_scrape_timestamp = match optional_env("DEFAULT_SCRAPE_TIMESTAMP") {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .with_context(|| format!("DEFAULT_SCRAPE_TIMESTAMP '{raw}' is not RFC 3339"))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            firecrawl_api_key: optional_env("FIRECRAWL_API_KEY"),
            firecrawl_base_url: optional_env("FIRECRAWL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FIRECRAWL_BASE_URL.to_string()),
            wanted_persons_source_url: optional_env("WANTED_PERSONS_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            wanted_persons_data_path: optional_env("WANTED_PERSONS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            default_scrape_timestamp,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openrouter_base_url: optional_env("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            convex_deployment_url: optional_env("CONVEX_DEPLOYMENT_URL"),
            resend_api_key: optional_env("RESEND_API_KEY"),
            recipients: optional_env("RECIPIENTS"),
            report_sender: optional_env("REPORT_SENDER")
                .unwrap_or_else(|| DEFAULT_REPORT_SENDER.to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with every optional collaborator unset and the dataset
    /// stored at `data_path`.
    pub fn for_tests(data_path: impl Into<PathBuf>) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            firecrawl_api_key: None,
            firecrawl_base_url: DEFAULT_FIRECRAWL_BASE_URL.to_string(),
            wanted_persons_source_url: DEFAULT_SOURCE_URL.to_string(),
            wanted_persons_data_path: data_path.into(),
            default_scrape_timestamp: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .map(|t| t.with_timezone(&Utc))
                .unwrap(),
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            convex_deployment_url: None,
            resend_api_key: None,
            recipients: None,
            report_sender: DEFAULT_REPORT_SENDER.to_string(),
        }
    }
}

/// Reads an environment variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
