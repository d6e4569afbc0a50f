// Prompt templates for the LLM extraction backend.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_GUESSING_INSTRUCTION};

pub const RESUME_FIELDS_SYSTEM: &str = "\
You are a resume parser. You read the plain text of one resume and report \
the candidate's contact details, skills, employers and college.";

pub const RESUME_FIELDS_PROMPT: &str = r#"Extract the following fields from the resume text below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "name": "string" | null,
  "email": "string" | null,
  "mobile_number": "string" | null,
  "skills": ["string"] | null,
  "company_names": ["string"] | null,
  "college_name": "string" | null
}

Rules:
- "skills" lists individual skills, one per array item.
- "company_names" lists employers only, most recent first.
- "college_name" is the most recent college or university attended."#;

/// Upper bound on resume characters forwarded to the model.
pub const MAX_RESUME_CHARS: usize = 24_000;

/// Full system prompt for the extraction call.
pub fn system_prompt() -> String {
    format!("{RESUME_FIELDS_SYSTEM} {JSON_ONLY_SYSTEM} {NO_GUESSING_INSTRUCTION}")
}

/// Fills the resume text into the prompt, truncated on a char boundary.
pub fn build_prompt(resume_text: &str) -> String {
    let text = match resume_text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((cut, _)) => &resume_text[..cut],
        None => resume_text,
    };
    RESUME_FIELDS_PROMPT.replace("{resume_text}", text.trim())
}
