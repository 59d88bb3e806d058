use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::orchestrator::ChatError;
use crate::convex::ConvexError;
use crate::llm_client::LlmError;
use crate::reports::email::EmailError;
use crate::wanted_persons::firecrawl::FirecrawlError;
use crate::wanted_persons::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required setting for an external collaborator is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external collaborator (extraction, model, email, database) failed.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "An upstream service is unavailable".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AppError::Configuration(err.to_string()),
            other => AppError::Upstream(format!("Language model call failed: {other}")),
        }
    }
}

impl From<FirecrawlError> for AppError {
    fn from(err: FirecrawlError) -> Self {
        match err {
            FirecrawlError::MissingApiKey => AppError::Configuration(err.to_string()),
            other => AppError::Upstream(format!("Wanted persons scrape failed: {other}")),
        }
    }
}

impl From<ConvexError> for AppError {
    fn from(err: ConvexError) -> Self {
        match err {
            ConvexError::MissingDeploymentUrl => AppError::Configuration(err.to_string()),
            other => AppError::Upstream(format!("Convex query failed: {other}")),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::MissingApiKey | EmailError::MissingRecipients => {
                AppError::Configuration(err.to_string())
            }
            other => AppError::Upstream(format!("Report email failed: {other}")),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyHistory | ChatError::BlankTurn(_) => {
                AppError::Validation(err.to_string())
            }
            ChatError::Llm(e) => e.into(),
        }
    }
}
