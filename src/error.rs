use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("OPENAI_API_KEY is not set. Export it or run `complaint-risk config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("LLM API call failed: {0}")]
    ApiCall(String),

    #[error("Failed to parse LLM API response: {0}")]
    ApiParse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV line {line} has {found} fields but the header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Expected columns missing: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] complaint_risk_common::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
