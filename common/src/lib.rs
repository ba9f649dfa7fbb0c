//! Complaint Risk Common Library
//!
//! I/O-free logic shared by the CLI: the risk taxonomy, model output
//! validation, prompt construction, the heuristic labeller and
//! classification metrics.

pub mod error;
pub mod heuristic;
pub mod metrics;
pub mod parser;
pub mod prompts;
pub mod taxonomy;
pub mod types;

pub use error::{Error, Result};
pub use heuristic::coerce_label;
pub use metrics::{classification_report, label_distribution, ClassificationReport, ConfusionMatrix};
pub use parser::{coerce_confidence, extract_json, parse_analysis, validate_response};
pub use prompts::{build_messages, build_user_prompt, ChatMessage, ChatRole, SYSTEM_PROMPT};
pub use taxonomy::{normalize_category, RiskCategory};
pub use types::{AnalysisOutcome, AnalysisResult, Extraction};
