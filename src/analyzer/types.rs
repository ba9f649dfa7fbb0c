use crate::error::Result;
use async_trait::async_trait;
use complaint_risk_common::{AnalysisOutcome, ChatMessage};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Token counts reported by the API
///
/// Every numeric top-level entry of the `usage` object, keyed by name.
/// Missing, null and non-numeric entries are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
    counts: BTreeMap<String, f64>,
}

impl TokenUsage {
    /// Collect the numeric counters of a `usage` object
    pub fn from_value(value: &Value) -> Self {
        let counts = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(key, v)| v.as_f64().map(|n| (key.clone(), n)))
                    .collect()
            })
            .unwrap_or_default();
        Self { counts }
    }

    pub fn from_counts<I, K>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            counts: counts.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.counts.get(key).copied()
    }

    pub fn total_tokens(&self) -> Option<f64> {
        self.get("total_tokens")
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(metric name, value)` pairs as logged to the tracker, `tokens_{key}`
    pub fn metrics(&self) -> Vec<(String, f64)> {
        self.counts
            .iter()
            .map(|(key, value)| (format!("tokens_{}", key), *value))
            .collect()
    }
}

/// Raw reply from the model
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: String,
    /// Model id reported by the API
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// The LLM collaborator: messages in, text out
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Configured model identifier
    fn model_name(&self) -> &str;

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse>;
}

/// One analysed complaint
#[derive(Debug, Clone)]
pub struct Analysis {
    pub outcome: AnalysisOutcome,
    /// Wall-clock time of the model call only
    pub latency: Duration,
    pub usage: Option<TokenUsage>,
    pub model: String,
}
