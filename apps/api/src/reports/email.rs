//! Report delivery through the Resend email API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::http::client_with_timeout;
use crate::reports::markdown::markdown_to_html;

const RESEND_API_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("RESEND_API_KEY is not configured")]
    MissingApiKey,

    #[error("RECIPIENTS is not configured")]
    MissingRecipients,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error sending to {recipient} (status {status}): {message}")]
    Api {
        recipient: String,
        status: u16,
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Clone)]
pub struct ReportMailer {
    client: Client,
    api_key: Option<String>,
    recipients: Vec<String>,
    sender: String,
    base_url: String,
}

impl ReportMailer {
    pub fn new(
        api_key: Option<String>,
        recipients: Option<&str>,
        sender: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: client_with_timeout("Resend", Duration::from_secs(30)),
            api_key,
            recipients: recipients.map(parse_recipients).unwrap_or_default(),
            sender: sender.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.resend_api_key.clone(),
            config.recipients.as_deref(),
            config.report_sender.clone(),
            RESEND_API_URL,
        )
    }

    /// Checks that delivery is possible without sending anything.
    pub fn ensure_configured(&self) -> Result<(), EmailError> {
        if self.api_key.is_none() {
            return Err(EmailError::MissingApiKey);
        }
        if self.recipients.is_empty() {
            return Err(EmailError::MissingRecipients);
        }
        Ok(())
    }

    /// Emails the report to every recipient, one message each.
    /// Returns the provider's message ids.
    pub async fn send_report(
        &self,
        report_markdown: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<Vec<String>, EmailError> {
        self.ensure_configured()?;
        let api_key = self.api_key.as_deref().ok_or(EmailError::MissingApiKey)?;

        let subject = report_subject(sent_at);
        let html = markdown_to_html(report_markdown);
        info!("Sending report to {} recipients", self.recipients.len());

        let mut ids = Vec::with_capacity(self.recipients.len());
        for recipient in &self.recipients {
            let response = self
                .client
                .post(format!("{}/emails", self.base_url))
                .bearer_auth(api_key)
                .json(&SendEmailRequest {
                    from: &self.sender,
                    to: [recipient.as_str()],
                    subject: &subject,
                    text: report_markdown,
                    html: &html,
                })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmailError::Api {
                    recipient: recipient.clone(),
                    status: status.as_u16(),
                    message,
                });
            }

            let sent: SendEmailResponse = response.json().await?;
            let id = sent.id.unwrap_or_default();
            info!("Sent email to {recipient}: {id}");
            ids.push(id);
        }

        info!("All emails sent successfully");
        Ok(ids)
    }
}

/// Splits a comma separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

pub fn report_subject(sent_at: DateTime<Utc>) -> String {
    format!("Crime Intelligence Brief – {}", sent_at.format("%B %d, %Y"))
}
