//! Chat orchestrator: gathers database context for the latest user turn and
//! asks the language model for a grounded reply.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::chat::prompts::{CHAT_PROMPT, CHAT_SYSTEM};
use crate::convex::{created_at_ms, ConvexClient};
use crate::llm_client::prompts::PRIVACY_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::chat::{ChatReference, ChatReply, ChatRole, ChatTurn};

const FEED_KEYWORDS: &[&str] = &["feed", "report", "crime", "incident"];
const CRIMINAL_KEYWORDS: &[&str] = &["criminal", "suspect", "wanted", "gang"];
const CONTEXT_LIMIT: usize = 5;
/// Attachment fields stripped from crime reports before they reach the prompt.
const REPORT_ATTACHMENT_FIELDS: &[&str] = &["fileUploads", "fileDescriptions"];

static CRIMINAL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:criminal|suspect|wanted(?:\s+person)?|gang\s+member)\s+(?:named\s+)?(?P<name>[A-Za-z][A-Za-z\s'-]{1,60})",
    )
    .expect("valid regex")
});

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat history cannot be empty.")]
    EmptyHistory,

    #[error("Chat turn {0} has empty content.")]
    BlankTurn(usize),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Which kinds of records the latest user message asks about.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContextNeeds {
    pub feed: bool,
    pub criminals: bool,
}

impl ContextNeeds {
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        Self {
            feed: FEED_KEYWORDS.iter().any(|k| lower.contains(k)),
            criminals: CRIMINAL_KEYWORDS.iter().any(|k| lower.contains(k)),
        }
    }
}

/// Records gathered for one reply.
#[derive(Debug, Default)]
struct ChatContext {
    feed: Vec<Value>,
    criminals: Vec<Value>,
}

impl ChatContext {
    fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&json!({
            "recentReports": self.feed,
            "criminalMatches": self.criminals,
        }))
        .unwrap_or_default()
    }

    fn references(&self) -> Vec<ChatReference> {
        let mut references = Vec::new();
        if !self.feed.is_empty() {
            references.push(ChatReference::Feed(self.feed.clone()));
        }
        if !self.criminals.is_empty() {
            references.push(ChatReference::Criminals(self.criminals.clone()));
        }
        references
    }
}

#[derive(Clone)]
pub struct ChatOrchestrator {
    llm: LlmClient,
    convex: ConvexClient,
}

impl ChatOrchestrator {
    pub fn new(llm: LlmClient, convex: ConvexClient) -> Self {
        Self { llm, convex }
    }

    /// Returns the assistant reply for `history`.
    pub async fn respond(&self, history: &[ChatTurn]) -> Result<ChatReply, ChatError> {
        let history = validate_history(history)?;
        self.llm.ensure_configured()?;

        let context = match latest_user_message(&history) {
            Some(message) => self.gather_context(message).await,
            None => {
                warn!("No user turn found in history; skipping context lookup.");
                ChatContext::default()
            }
        };

        let prompt = CHAT_PROMPT
            .replace("{history}", &format_history(&history))
            .replace("{context}", &context.to_prompt_json())
            .replace("{privacy}", PRIVACY_INSTRUCTION);

        let references = context.references();
        debug!(
            "Generating chat response with {} context references",
            references.len()
        );

        let text = self.llm.complete(&prompt, CHAT_SYSTEM).await?;
        debug!("Chat response generated ({} chars)", text.len());

        Ok(ChatReply { text, references })
    }

    async fn gather_context(&self, message: &str) -> ChatContext {
        let mut context = ChatContext::default();

        if !self.convex.is_configured() {
            debug!("Convex deployment URL not configured; skipping data lookups.");
            return context;
        }

        let needs = ContextNeeds::detect(message);
        if needs.feed {
            context.feed = self.fetch_recent_reports().await;
        }
        if needs.criminals {
            let search = extract_criminal_search_term(message);
            context.criminals = self.fetch_criminals(search.as_deref()).await;
        }
        context
    }

    async fn fetch_recent_reports(&self) -> Vec<Value> {
        match self.convex.query_list("crimeReports:list", json!({})).await {
            Ok(reports) => recent_reports(reports, CONTEXT_LIMIT),
            Err(e) => {
                error!("Failed to retrieve crime reports: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_criminals(&self, search: Option<&str>) -> Vec<Value> {
        let args = match search {
            Some(term) => json!({ "search": term }),
            None => json!({}),
        };
        match self.convex.query_list("criminals:list", args).await {
            Ok(mut records) => {
                records.truncate(CONTEXT_LIMIT);
                records
            }
            Err(e) => {
                error!("Failed to retrieve criminals: {e}");
                Vec::new()
            }
        }
    }
}

/// Trims every turn and rejects empty histories and blank turns.
fn validate_history(history: &[ChatTurn]) -> Result<Vec<ChatTurn>, ChatError> {
    if history.is_empty() {
        return Err(ChatError::EmptyHistory);
    }
    history
        .iter()
        .enumerate()
        .map(|(idx, turn)| {
            let content = turn.content.trim();
            if content.is_empty() {
                return Err(ChatError::BlankTurn(idx));
            }
            Ok(ChatTurn {
                role: turn.role,
                content: content.to_string(),
            })
        })
        .collect()
}

fn latest_user_message(history: &[ChatTurn]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|turn| turn.role == ChatRole::User)
        .map(|turn| turn.content.as_str())
}

/// Renders the history as a role-tagged transcript.
pub fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{role}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Newest `limit` reports first, with attachment fields removed.
pub fn recent_reports(mut reports: Vec<Value>, limit: usize) -> Vec<Value> {
    reports.sort_by_key(|r| std::cmp::Reverse(created_at_ms(r)));
    reports.truncate(limit);
    for report in &mut reports {
        if let Some(obj) = report.as_object_mut() {
            for field in REPORT_ATTACHMENT_FIELDS {
                obj.remove(*field);
            }
        }
    }
    reports
}

/// Pulls a likely name out of messages like "any news on the suspect named John Brown?".
pub fn extract_criminal_search_term(message: &str) -> Option<String> {
    let captures = CRIMINAL_NAME_RE.captures(message)?;
    let candidate = captures
        .name("name")?
        .as_str()
        .trim()
        .trim_matches(|c| matches!(c, '.' | ',' | '!' | '?'));
    (!candidate.is_empty()).then(|| candidate.to_string())
}
