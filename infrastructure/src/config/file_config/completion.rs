//! Completion API configuration from TOML (`[completion]` section)

use serde::{Deserialize, Serialize};

/// Anthropic Messages API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompletionConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Model used for contributions and summaries.
    pub model: String,
    /// `anthropic-version` header value.
    pub api_version: String,
    /// HTTP timeout per request in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileCompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            model: "claude-sonnet-4-5".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl FileCompletionConfig {
    /// Resolve the API key: the direct value wins over the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
