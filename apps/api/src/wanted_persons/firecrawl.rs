//! Firecrawl extraction client.
//!
//! `POST /v1/extract` either answers with the finished result or with a job
//! id; in the latter case the job is polled at a fixed interval until it
//! completes, fails, or the poll budget runs out.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::http::client_with_timeout;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_MAX_POLLS: u32 = 90;

#[derive(Debug, Error)]
pub enum FirecrawlError {
    #[error("FIRECRAWL_API_KEY is not configured; cannot run scrape")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Firecrawl extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Extraction job {job_id} did not finish after {polls} polls")]
    Timeout { job_id: String, polls: u32 },
}

/// Body of an extraction request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest<'a> {
    pub urls: Vec<&'a str>,
    pub prompt: &'a str,
    pub schema: Value,
    pub enable_web_search: bool,
    pub agent: ExtractAgent<'a>,
}

#[derive(Debug, Serialize)]
pub struct ExtractAgent<'a> {
    pub model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    success: bool,
    id: Option<String>,
    status: Option<String>,
    data: Option<Value>,
    error: Option<String>,
}

/// Outcome of one extraction response.
enum JobState {
    Done(Value),
    /// Still running; the id is only guaranteed on the initial response.
    Pending(Option<String>),
}

#[derive(Clone)]
pub struct FirecrawlClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl FirecrawlClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: client_with_timeout("Firecrawl", Duration::from_secs(120)),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    #[cfg(test)]
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Runs an extraction and returns the `data` object of the finished job.
    pub async fn extract(&self, request: &ExtractRequest<'_>) -> Result<Value, FirecrawlError> {
        let api_key = self.api_key.as_deref().ok_or(FirecrawlError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/v1/extract", self.base_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let job_id = match parse_response(response).await? {
            JobState::Done(data) => return Ok(data),
            JobState::Pending(Some(id)) => id,
            JobState::Pending(None) => {
                return Err(FirecrawlError::ExtractionFailed(
                    "response carried neither data nor a job id".to_string(),
                ))
            }
        };

        info!("Firecrawl extraction job {job_id} started; polling for completion");

        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(format!("{}/v1/extract/{}", self.base_url, job_id))
                .bearer_auth(api_key)
                .send()
                .await?;

            match parse_response(response).await? {
                JobState::Done(data) => {
                    debug!("Firecrawl job {job_id} completed after {attempt} polls");
                    return Ok(data);
                }
                JobState::Pending(_) => continue,
            }
        }

        Err(FirecrawlError::Timeout {
            job_id,
            polls: self.max_polls,
        })
    }
}

async fn parse_response(response: reqwest::Response) -> Result<JobState, FirecrawlError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(FirecrawlError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body: ExtractResponse = response.json().await?;
    if !body.success {
        return Err(FirecrawlError::ExtractionFailed(
            body.error.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    match (body.status.as_deref(), body.data) {
        (Some("failed" | "cancelled"), _) => Err(FirecrawlError::ExtractionFailed(
            body.error
                .unwrap_or_else(|| "extraction job did not complete".to_string()),
        )),
        (Some("completed") | None, Some(data)) => Ok(JobState::Done(data)),
        (Some("completed"), None) => Ok(JobState::Done(Value::Null)),
        _ => Ok(JobState::Pending(body.id)),
    }
}
