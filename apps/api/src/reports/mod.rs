// Daily crime intelligence report: collect the last 24 hours of activity,
// summarize it through the language model and email it to recipients.

pub mod activity;
pub mod email;
pub mod generator;
pub mod handlers;
pub mod markdown;
pub mod prompts;
