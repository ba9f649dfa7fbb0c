//! Prompt construction
//!
//! - SYSTEM_PROMPT: analyst persona and output rules
//! - OUTPUT_SCHEMA: schema description embedded in the user prompt
//! - build_user_prompt / build_messages: per-complaint request

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// System instruction
pub const SYSTEM_PROMPT: &str = "You are a careful financial complaints analyst.
Return ONLY valid JSON matching the schema and be neutral, concise, and specific.
Risk categories (Return exactly one of these): Billing, Collections, DataPrivacy, Fees, MisSelling, Fraud, Other.
IMPORTANT:
- 'risk_confidence' MUST be a number between 0 and 1 (no quotes, not a string, not a percentage).
- Arrays must contain plain strings.
- Do not include any keys not in the schema.";

/// JSON schema of the expected answer
pub const OUTPUT_SCHEMA: &str = r#"{
  "type": "object",
  "required": ["summary", "risk_category", "risk_confidence", "extraction"],
  "properties": {
    "summary": {"type": "string", "description": "2-3 sentence neutral summary of the complaint"},
    "risk_category": {"type": "string", "enum": ["Billing", "Collections", "DataPrivacy", "Fees", "MisSelling", "Fraud", "Other"]},
    "risk_confidence": {"type": "number", "minimum": 0, "maximum": 1},
    "extraction": {
      "type": "object",
      "properties": {
        "customer_entities": {"type": "array", "items": {"type": "string"}},
        "company_entities": {"type": "array", "items": {"type": "string"}},
        "amounts": {"type": "array", "items": {"type": "string"}},
        "dates": {"type": "array", "items": {"type": "string"}}
      }
    }
  }
}"#;

/// Build the user prompt for one complaint
pub fn build_user_prompt(text: &str) -> String {
    format!(
        r#"Text: """{text}"""

Respond in JSON only, matching this schema:
{schema}

Note: risk_confidence must be a bare number (e.g., 0.74), not "0.74" and not "74%"."#,
        text = text,
        schema = OUTPUT_SCHEMA
    )
}

/// System + user message pair for one complaint
pub fn build_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(text)),
    ]
}
