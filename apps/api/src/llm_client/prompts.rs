// Shared prompt fragments. Each module that calls the completion service keeps its
// own prompts.rs alongside it; only cross-cutting pieces live here.

/// System prompt for calls whose answer must be a bare JSON array.
pub const JSON_ARRAY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with a single valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    If nothing matches, respond with [].";

/// System prompt for calls whose answer is one short line of plain text.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a concise assistant. \
    Respond with the requested text only, on a single line, \
    without quotes, labels, markdown or explanations.";
