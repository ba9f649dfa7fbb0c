mod openai;
mod types;

pub use openai::OpenAiClient;
pub use types::{Analysis, ChatModel, ChatResponse, TokenUsage};

use crate::error::Result;
use crate::tracking::Tracker;
use complaint_risk_common::{build_messages, validate_response, AnalysisOutcome};
use std::time::Instant;
use tracing::debug;

/// Analyse one complaint text
///
/// Sends a single request, times the call, and validates the reply. A reply
/// that fails validation is returned as a parse-failure outcome; only
/// transport errors are returned as `Err`.
///
/// With a tracker, the call is wrapped in an `analyze_single` run that is
/// closed on every path and nests under any active run.
pub async fn analyze_text<M>(model: &M, text: &str, tracker: Option<&Tracker>) -> Result<Analysis>
where
    M: ChatModel + ?Sized,
{
    let messages = build_messages(text);
    let mut run = tracker.map(|t| t.start_run("analyze_single"));

    let started = Instant::now();
    let response = model.chat(&messages).await?;
    let latency = started.elapsed();

    debug!(
        latency_ms = latency.as_millis() as u64,
        response_len = response.content.len(),
        "model call completed"
    );

    let outcome = validate_response(&response.content);
    if let AnalysisOutcome::ParseFailure { error, .. } = &outcome {
        debug!(error = %error, "model response failed validation");
    }

    if let Some(run) = run.as_mut() {
        run.log_metric("latency_s", latency.as_secs_f64(), None);
        if let Some(usage) = &response.usage {
            for (key, value) in usage.metrics() {
                run.log_metric(&key, value, None);
            }
        }
        run.log_param("model", model.model_name());
    }
    if let Some(run) = run {
        run.finish();
    }

    Ok(Analysis {
        outcome,
        latency,
        usage: response.usage,
        model: if response.model.is_empty() {
            model.model_name().to_string()
        } else {
            response.model
        },
    })
}
