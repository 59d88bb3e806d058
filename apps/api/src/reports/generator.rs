//! Report Generator: turns collected activity into a markdown intelligence brief.
//!
//! Flow: condense activity JSON into facts (1 LLM call) → write each section
//! from the facts (1 LLM call per section) → assemble markdown.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PRIVACY_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::reports::activity::ActivitySnapshot;
use crate::reports::prompts::{CONDENSE_PROMPT, CONDENSE_SYSTEM, SECTION_PROMPT, SECTION_SYSTEM};

/// Sections of the brief, in output order.
pub const REPORT_SECTIONS: &[&str] = &[
    "Overview",
    "Incident Breakdown",
    "Hotspot Analysis",
    "Tips and Leads",
    "Action Items",
];

/// Generates the full markdown report for `activity`.
pub async fn generate_report(
    llm: &LlmClient,
    activity: &ActivitySnapshot,
    generated_at: DateTime<Utc>,
) -> Result<String, LlmError> {
    info!("Condensing activity data");
    let raw_data = serde_json::to_string_pretty(activity).unwrap_or_default();
    let condense_prompt = CONDENSE_PROMPT
        .replace("{raw_data}", &raw_data)
        .replace("{grounding}", GROUNDING_INSTRUCTION);
    let facts = llm.complete(&condense_prompt, CONDENSE_SYSTEM).await?;

    info!("Generating report sections");
    let mut sections = Vec::with_capacity(REPORT_SECTIONS.len());
    for &section in REPORT_SECTIONS {
        info!("Generating section: {section}");
        let prompt = SECTION_PROMPT
            .replace("{section_name}", section)
            .replace("{facts}", &facts)
            .replace("{grounding}", GROUNDING_INSTRUCTION)
            .replace("{privacy}", PRIVACY_INSTRUCTION);
        let body = llm.complete(&prompt, SECTION_SYSTEM).await?;
        sections.push((section, body));
    }

    let report = assemble_report(generated_at, &sections);
    info!("Report generated successfully ({} characters)", report.len());
    Ok(report)
}

/// Builds the report markdown: title, italic timestamp line, then one
/// `## ` heading per section followed by its body.
pub fn assemble_report(generated_at: DateTime<Utc>, sections: &[(&str, String)]) -> String {
    let mut parts = vec![
        format!(
            "# Crime Intelligence Brief - {}",
            generated_at.format("%Y-%m-%d")
        ),
        format!("\n*Generated at {}*\n", generated_at.format("%I:%M %p")),
    ];
    for (name, body) in sections {
        parts.push(format!("\n## {name}\n"));
        parts.push(body.clone());
    }
    parts.join("\n")
}
