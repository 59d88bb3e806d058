// Report generator LLM prompt templates.

pub const CONDENSE_SYSTEM: &str = "\
You are a crime intelligence analyst. \
Condense raw database activity into short, factual bullet points. \
Group related incidents and note locations, times, suspects and tip leads.";

pub const CONDENSE_PROMPT: &str = r#"Condense the following 24-hour crime activity into a bullet point summary of key facts.

The JSON contains three lists: "incidents" (crime reports), "criminals" (profiles linked to those reports) and "tips" (public tips).

RAW DATA:
{raw_data}

{grounding}

Return only the bullet points, one fact per line, each starting with "- "."#;

pub const SECTION_SYSTEM: &str = "\
You write sections of a daily crime intelligence brief for police commanders. \
Write concise markdown. Use \"### \" for sub-headings and \"- \" for lists. \
Do NOT repeat the section title.";

pub const SECTION_PROMPT: &str = r#"Write the "{section_name}" section of today's crime intelligence brief.

CONDENSED FACTS:
{facts}

{grounding}
{privacy}

Return only the markdown body of the section."#;
