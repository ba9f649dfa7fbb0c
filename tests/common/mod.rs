//! Scripted in-memory model shared by the integration tests

use async_trait::async_trait;
use complaint_risk::analyzer::{ChatModel, ChatResponse, TokenUsage};
use complaint_risk::error::{AnalyzerError, Result};
use complaint_risk_common::ChatMessage;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const VALID_REPLY: &str = r#"{
  "summary": "Customer was charged a late fee twice.",
  "risk_category": "fees",
  "risk_confidence": "80%",
  "extraction": {
    "customer_entities": ["Jane Doe"],
    "company_entities": ["Acme Bank"],
    "amounts": ["$35"],
    "dates": ["2023-03-01"]
  }
}"#;

/// Replies are consumed in order; an exhausted script is a transport error
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn valid(n: usize) -> Self {
        Self::new((0..n).map(|_| Ok(VALID_REPLY.to_string())).collect())
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        if let Some(user) = messages.last() {
            self.prompts.lock().unwrap().push(user.content.clone());
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AnalyzerError::ApiCall("script exhausted".into())))?;

        Ok(ChatResponse {
            content: reply,
            model: "scripted-1".into(),
            usage: Some(TokenUsage::from_counts([
                ("prompt_tokens", 120.0),
                ("completion_tokens", 40.0),
                ("total_tokens", 160.0),
            ])),
        })
    }
}
