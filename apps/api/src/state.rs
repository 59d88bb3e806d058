use std::sync::Arc;

use crate::chat::orchestrator::ChatOrchestrator;
use crate::config::Config;
use crate::convex::ConvexClient;
use crate::llm_client::LlmClient;
use crate::reports::email::ReportMailer;
use crate::wanted_persons::scraper::{FirecrawlScraper, WantedPersonsSource};
use crate::wanted_persons::store::DatasetStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Persisted wanted persons snapshot.
    pub store: DatasetStore,
    /// Pluggable scraper. Default: FirecrawlScraper.
    pub scraper: Arc<dyn WantedPersonsSource>,
    pub llm: LlmClient,
    pub convex: ConvexClient,
    pub mailer: ReportMailer,
    pub chat: ChatOrchestrator,
}

impl AppState {
    /// Wires every component from one configuration.
    pub fn from_config(config: Config) -> Self {
        let llm = LlmClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
        );
        let convex = ConvexClient::new(config.convex_deployment_url.clone());

        Self {
            store: DatasetStore::from_config(&config),
            scraper: Arc::new(FirecrawlScraper::from_config(&config)),
            mailer: ReportMailer::from_config(&config),
            chat: ChatOrchestrator::new(llm.clone(), convex.clone()),
            llm,
            convex,
            config: Arc::new(config),
        }
    }
}
