use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Transport timeout for a single LLM call
    pub timeout_seconds: u64,
    /// Root of the experiment-tracking file store
    pub tracking_dir: PathBuf,
    pub experiment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            temperature: 0.2,
            timeout_seconds: 120,
            tracking_dir: PathBuf::from("mlruns"),
            experiment: "finance-llm".into(),
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// File contents only, defaults when the file is absent
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AnalyzerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("complaint-risk").join("config.json"))
    }

    /// Environment wins over the file; empty values are ignored
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            self.base_url = base_url;
        }
    }

    pub fn get_api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or(AnalyzerError::MissingApiKey)
    }

    /// Persist an API key to the config file, returning its path
    pub fn set_api_key(key: String) -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::set_api_key_at(&path, key)?;
        Ok(path)
    }

    /// Rewrite `path` with the key set; environment overrides are never written
    pub fn set_api_key_at(path: &Path, key: String) -> Result<()> {
        let mut stored = Self::load_file(path)?;
        stored.api_key = Some(key);
        stored.save_to(path)
    }
}
