//! Analysis result types
//!
//! - Extraction: entity lists pulled out of the complaint
//! - AnalysisResult: validated model output
//! - AnalysisOutcome: validated result or a parse failure record

use crate::taxonomy::RiskCategory;
use serde::{Deserialize, Serialize};

/// Entities extracted from the complaint text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extraction {
    pub customer_entities: Vec<String>,
    pub company_entities: Vec<String>,
    pub amounts: Vec<String>,
    pub dates: Vec<String>,
}

/// Validated model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 2-3 sentence neutral summary
    pub summary: String,
    pub risk_category: RiskCategory,
    /// Always within [0, 1]
    pub risk_confidence: f64,
    pub extraction: Extraction,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            summary: String::new(),
            risk_category: RiskCategory::Other,
            risk_confidence: 0.0,
            extraction: Extraction::default(),
        }
    }
}

/// Result of validating one raw model response
///
/// Serialized untagged: a parsed outcome looks like the result itself,
/// a failure looks like `{"parse_error": ..., "raw": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Parsed(AnalysisResult),
    ParseFailure {
        #[serde(rename = "parse_error")]
        error: String,
        raw: String,
    },
}

impl AnalysisOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisOutcome::ParseFailure { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Parsed(result) => Some(result),
            AnalysisOutcome::ParseFailure { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            AnalysisOutcome::Parsed(result) => Some(result),
            AnalysisOutcome::ParseFailure { .. } => None,
        }
    }
}
