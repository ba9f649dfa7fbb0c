//! OpenAI-compatible chat completions client
//!
//! Sends the system/user message pair to `{base_url}/chat/completions`
//! and returns the first choice's text. Any server speaking the same
//! request shape (Azure proxies, local gateways) works via `base_url`.

use super::types::{ChatModel, ChatResponse, TokenUsage};
use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use complaint_risk_common::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

/// Decode a completions body into a [`ChatResponse`]
fn parse_completion(body: &str) -> Result<ChatResponse> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| AnalyzerError::ApiParse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AnalyzerError::ApiParse("no choices in response".into()))?;

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        model: parsed.model,
        usage: parsed
            .usage
            .as_ref()
            .map(TokenUsage::from_value)
            .filter(|usage| !usage.is_empty()),
    })
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        debug!(url = %url, model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalyzerError::ApiCall(format!("status {}: {}", status, body)));
        }

        parse_completion(&body)
    }
}
