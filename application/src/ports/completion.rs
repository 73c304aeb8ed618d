//! Completion service port
//!
//! Defines the interface for turning a prompt into generated text.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a completion call
///
/// The pipeline only distinguishes success from failure; the variants exist
/// for logging and for adapters that want to report precisely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl CompletionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}

/// Why a request is being made.
///
/// Carried on every request so logs (and test doubles) can tell a degraded
/// retry apart from a primary summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A participant's contribution to a round
    Contribution,
    /// Primary round summary
    Summary,
    /// One-shot retry with the shorter summary template
    DegradedSummary,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Contribution => "contribution",
            RequestKind::Summary => "summary",
            RequestKind::DegradedSummary => "degraded_summary",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rendered completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub kind: RequestKind,
    pub system: String,
    pub prompt: String,
    /// Upper bound on generated tokens; a soft length target, not validated
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(
        kind: RequestKind,
        system: impl Into<String>,
        prompt: impl Into<String>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            kind,
            system: system.into(),
            prompt: prompt.into(),
            max_output_tokens,
        }
    }
}

/// Text-generation capability
///
/// Implementations (adapters) live in the infrastructure layer. They must
/// enforce a request timeout. Dropping the returned future must abandon the
/// underlying request; that is how callers cancel.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate text for the request
    async fn generate(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
