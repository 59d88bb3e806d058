// Chat assistant: answers questions grounded in recent crime reports and criminal records.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
