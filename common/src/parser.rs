//! Model response validation
//!
//! Extracts the JSON object from a raw LLM response and coerces it into an
//! [`AnalysisResult`]: category strings are folded into the taxonomy,
//! confidence values are converted and clamped, and missing extraction
//! lists become empty. A response that cannot be validated becomes an
//! [`AnalysisOutcome::ParseFailure`] instead of an error.

use crate::error::{Error, Result};
use crate::taxonomy::normalize_category;
use crate::types::{AnalysisOutcome, AnalysisResult, Extraction};
use serde::Deserialize;
use serde_json::Value;

/// Response shape before coercion
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    summary: String,
    risk_category: Value,
    risk_confidence: Value,
    extraction: RawExtraction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExtraction {
    customer_entities: Option<Vec<Value>>,
    company_entities: Option<Vec<Value>>,
    amounts: Option<Vec<Value>>,
    dates: Option<Vec<Value>>,
}

/// Locate the JSON object inside a response
///
/// Extraction order:
/// 1. the whole trimmed response, when it is already a JSON object
/// 2. ```json ... ``` block
/// 3. span from the first `{` to the last `}`
/// 4. error
///
/// # Examples
/// ```
/// use complaint_risk_common::extract_json;
///
/// let response = "Sure! {\"summary\": \"x\"} Hope this helps.";
/// assert_eq!(extract_json(response).unwrap(), "{\"summary\": \"x\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    let trimmed = response.trim();
    if trimmed.starts_with('{') && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed);
    }

    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON object found in response".into()))
}

/// Convert a confidence value into [0, 1]
///
/// Accepts a JSON number, a numeric string (`"0.74"`) or a percentage
/// string (`"74%"`). Out-of-range values are clamped, not rejected; that
/// includes infinities spelled as strings (`"inf"`, `"1e999"`). Only NaN
/// fails. A JSON number literal beyond f64 range (`1e400`) never gets here:
/// serde_json rejects the document.
pub fn coerce_confidence(value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::Parse(format!("risk_confidence: {} is not representable", n)))?,
        Value::String(s) => parse_confidence_str(s)?,
        other => {
            return Err(Error::Parse(format!(
                "risk_confidence: expected a number or numeric string, got {}",
                other
            )))
        }
    };

    if parsed.is_nan() {
        return Err(Error::Parse(format!("risk_confidence: {} is not a number", value)));
    }

    Ok(parsed.clamp(0.0, 1.0))
}

fn parse_confidence_str(s: &str) -> Result<f64> {
    let s = s.trim();
    let invalid = || Error::Parse(format!("risk_confidence: cannot parse {:?} as a number", s));

    match s.strip_suffix('%') {
        Some(percent) => percent
            .trim()
            .parse::<f64>()
            .map(|v| v / 100.0)
            .map_err(|_| invalid()),
        None => s.parse::<f64>().map_err(|_| invalid()),
    }
}

fn coerce_list(field: &str, items: Option<Vec<Value>>) -> Result<Vec<String>> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(Error::Parse(format!(
                "extraction.{}: expected string items, got {}",
                field, other
            ))),
        })
        .collect()
}

/// Validate a raw response into an [`AnalysisResult`]
pub fn parse_analysis(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json(response)?;
    let raw: RawAnalysis = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("invalid analysis JSON: {}", e)))?;

    let risk_category = match &raw.risk_category {
        Value::String(s) => normalize_category(s),
        other => normalize_category(&other.to_string()),
    };
    let risk_confidence = coerce_confidence(&raw.risk_confidence)?;

    let extraction = Extraction {
        customer_entities: coerce_list("customer_entities", raw.extraction.customer_entities)?,
        company_entities: coerce_list("company_entities", raw.extraction.company_entities)?,
        amounts: coerce_list("amounts", raw.extraction.amounts)?,
        dates: coerce_list("dates", raw.extraction.dates)?,
    };

    Ok(AnalysisResult {
        summary: raw.summary,
        risk_category,
        risk_confidence,
        extraction,
    })
}

/// Validate a raw response, turning any failure into a failure record
pub fn validate_response(response: &str) -> AnalysisOutcome {
    match parse_analysis(response) {
        Ok(result) => AnalysisOutcome::Parsed(result),
        Err(e) => AnalysisOutcome::ParseFailure {
            error: e.to_string(),
            raw: response.to_string(),
        },
    }
}
