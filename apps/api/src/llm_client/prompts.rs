// Shared prompt fragments.
// Each agent keeps its own templates in agents/prompts.rs; this file holds
// the cross-cutting instruction appended to every structured-output prompt.

/// Instruction appended to prompts whose output is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT include explanations or apologies.";
