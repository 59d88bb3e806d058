// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Common instruction appended to every prompt that carries database records.
pub const GROUNDING_INSTRUCTION: &str = "\
    Only state facts that appear in the supplied data. \
    Do NOT invent names, locations, dates, or incident counts. \
    If the data does not cover something, say that it was not available.";

/// Keeps personal data in outputs to what investigators need.
pub const PRIVACY_INSTRUCTION: &str = "\
    Never reveal tipster identities or contact details. \
    Refer to suspects only by the names and aliases present in the records.";
