//! Minimal client for Convex's HTTP query API.
//!
//! Crime reports, tips and criminal profiles live in a Convex deployment; the
//! report collector and the chat orchestrator read them through `query`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::http::client_with_timeout;

#[derive(Debug, Error)]
pub enum ConvexError {
    #[error("CONVEX_DEPLOYMENT_URL is not configured")]
    MissingDeploymentUrl,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Query {path} failed: {message}")]
    Query { path: String, message: String },
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    path: &'a str,
    args: &'a Value,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum QueryResponse {
    Success {
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

#[derive(Clone)]
pub struct ConvexClient {
    client: Client,
    deployment_url: Option<String>,
}

impl ConvexClient {
    pub fn new(deployment_url: Option<String>) -> Self {
        Self {
            client: client_with_timeout("Convex", Duration::from_secs(30)),
            deployment_url: deployment_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.deployment_url.is_some()
    }

    /// Runs a Convex query function, e.g. `crimeReports:list`.
    pub async fn query(&self, path: &str, args: Value) -> Result<Value, ConvexError> {
        let base = self
            .deployment_url
            .as_deref()
            .ok_or(ConvexError::MissingDeploymentUrl)?;

        let response = self
            .client
            .post(format!("{base}/api/query"))
            .json(&QueryRequest {
                path,
                args: &args,
                format: "json",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ConvexError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<QueryResponse>().await? {
            QueryResponse::Success { value } => {
                debug!("Convex query {path} succeeded");
                Ok(value)
            }
            QueryResponse::Error { error_message } => Err(ConvexError::Query {
                path: path.to_string(),
                message: error_message,
            }),
        }
    }

    /// Runs a query expected to return a list of documents. Non-array
    /// results are treated as an empty list.
    pub async fn query_list(&self, path: &str, args: Value) -> Result<Vec<Value>, ConvexError> {
        Ok(match self.query(path, args).await? {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }
}

/// Reads a document's `createdAt` field (epoch milliseconds), defaulting to 0.
pub fn created_at_ms(doc: &Value) -> i64 {
    doc.get("createdAt")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}
