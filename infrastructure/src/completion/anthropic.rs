//! Anthropic Messages API adapter
//!
//! One `POST {base_url}/v1/messages` per [`CompletionRequest`], no streaming
//! and no retries. Retry policy lives in the application layer.

use crate::config::FileCompletionConfig;
use async_trait::async_trait;
use council_application::{CompletionError, CompletionRequest, CompletionService};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors building the HTTP adapter
#[derive(Error, Debug)]
pub enum CompletionSetupError {
    #[error("No API key: set {0} or completion.api_key")]
    MissingApiKey(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Resolved connection settings
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl CompletionSettings {
    /// Resolve settings from the `[completion]` section, reading the API key
    /// from the environment when it is not set directly.
    pub fn from_config(config: &FileCompletionConfig) -> Result<Self, CompletionSetupError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| CompletionSetupError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// [`CompletionService`] backed by the Anthropic Messages API
pub struct AnthropicCompletionService {
    settings: CompletionSettings,
    client: reqwest::Client,
}

impl AnthropicCompletionService {
    pub fn new(settings: CompletionSettings) -> Result<Self, CompletionSetupError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { settings, client })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url)
    }
}

fn map_transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl CompletionService for AnthropicCompletionService {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            kind = request.kind.as_str(),
            model = %self.settings.model,
            max_tokens = request.max_output_tokens,
            "sending completion request"
        );

        let body = MessagesRequest {
            model: &self.settings.model,
            max_tokens: request.max_output_tokens,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(if status.as_u16() == 429 {
                CompletionError::RateLimited(text)
            } else {
                CompletionError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), text))
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout
            } else {
                CompletionError::MalformedResponse(e.to_string())
            }
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(CompletionError::MalformedResponse(
                "response has no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_application::RequestKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, timeout: Duration) -> AnthropicCompletionService {
        AnthropicCompletionService::new(CompletionSettings {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout,
        })
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            RequestKind::Summary,
            "Summarize.",
            "Round 1: the economist wants option A.",
            150,
        )
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 150,
                "system": "Summarize.",
                "messages": [{"role": "user", "content": "Round 1: the economist wants option A."}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"type": "text", "text": "The economist "},
                    {"type": "text", "text": "favours option A."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = service(&server, Duration::from_secs(5))
            .generate(&request())
            .await
            .unwrap();
        assert_eq!(text, "The economist favours option A.");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = service(&server, Duration::from_secs(5))
            .generate(&request())
            .await
            .unwrap_err();
        assert_eq!(err, CompletionError::RateLimited("slow down".to_string()));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = service(&server, Duration::from_secs(5))
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::RequestFailed(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_missing_text_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "tool_use", "id": "x", "name": "y", "input": {}}]
            })))
            .mount(&server)
            .await;

        let err = service(&server, Duration::from_secs(5))
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"content": [{"type": "text", "text": "late"}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = service(&server, Duration::from_millis(100))
            .generate(&request())
            .await
            .unwrap_err();
        assert_eq!(err, CompletionError::Timeout);
    }

    #[test]
    fn test_settings_require_api_key() {
        let config = FileCompletionConfig {
            api_key_env: "COUNCIL_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CompletionSettings::from_config(&config),
            Err(CompletionSetupError::MissingApiKey(_))
        ));

        let config = FileCompletionConfig {
            api_key: Some("k".to_string()),
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        let settings = CompletionSettings::from_config(&config).unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080");
    }
}
