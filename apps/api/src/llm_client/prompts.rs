// Cross-cutting prompt fragments. Each caller keeps its own prompts.rs
// alongside it and composes these in.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keeps the model from filling gaps with plausible guesses.
pub const NO_GUESSING_INSTRUCTION: &str = "\
    Only report values that appear in the document. \
    If a value is not present, use null. Never invent or normalise contact details.";
