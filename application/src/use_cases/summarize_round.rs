//! Round Summarizer
//!
//! Stateless transformer from one round's contributions to a bounded-length
//! summary. It makes exactly one completion call per invocation and never
//! retries; retry policy belongs to the
//! [`SummaryScheduler`](super::summary_scheduler::SummaryScheduler).

use crate::config::SummaryParams;
use crate::ports::completion::{CompletionError, CompletionRequest, CompletionService, RequestKind};
use council_domain::{Contribution, PromptTemplate, Question, RoundNumber};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from a single summarization attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("Summarizing round {round} failed: {source}")]
    CompletionFailure {
        round: RoundNumber,
        #[source]
        source: CompletionError,
    },

    #[error("Invalid summarization input: {0}")]
    InvalidInput(String),
}

impl SummarizeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            SummarizeError::CompletionFailure {
                source: CompletionError::Cancelled,
                ..
            }
        )
    }
}

/// Turns a round's contributions into summary text
pub struct RoundSummarizer<C: CompletionService + ?Sized> {
    completion: Arc<C>,
    params: SummaryParams,
}

impl<C: CompletionService + ?Sized> Clone for RoundSummarizer<C> {
    fn clone(&self) -> Self {
        Self {
            completion: Arc::clone(&self.completion),
            params: self.params.clone(),
        }
    }
}

impl<C: CompletionService + ?Sized> RoundSummarizer<C> {
    pub fn new(completion: Arc<C>, params: SummaryParams) -> Self {
        Self { completion, params }
    }

    pub fn params(&self) -> &SummaryParams {
        &self.params
    }

    /// Summarize a round with the full template.
    ///
    /// `problem` is only rendered into the request for round 1.
    pub async fn summarize(
        &self,
        round: RoundNumber,
        contributions: &[Contribution],
        problem: Option<&Question>,
    ) -> Result<String, SummarizeError> {
        Self::validate(round, contributions)?;

        let request = CompletionRequest::new(
            RequestKind::Summary,
            PromptTemplate::summary_system(),
            PromptTemplate::summary_prompt(round, contributions, problem.map(Question::content)),
            self.params.max_output_tokens,
        );
        self.call(round, &request).await
    }

    /// Summarize a round with the shorter retry template.
    ///
    /// Output from this path is lower quality than [`summarize`](Self::summarize);
    /// callers should mark it as degraded.
    pub async fn summarize_degraded(
        &self,
        round: RoundNumber,
        contributions: &[Contribution],
    ) -> Result<String, SummarizeError> {
        Self::validate(round, contributions)?;

        let request = CompletionRequest::new(
            RequestKind::DegradedSummary,
            PromptTemplate::degraded_summary_system(),
            PromptTemplate::degraded_summary_prompt(round, contributions),
            self.params.degraded_max_output_tokens,
        );
        self.call(round, &request).await
    }

    fn validate(round: RoundNumber, contributions: &[Contribution]) -> Result<(), SummarizeError> {
        if round == 0 {
            return Err(SummarizeError::InvalidInput(
                "round numbers start at 1".to_string(),
            ));
        }
        if contributions.is_empty() {
            return Err(SummarizeError::InvalidInput(format!(
                "round {} has no contributions",
                round
            )));
        }
        Ok(())
    }

    async fn call(
        &self,
        round: RoundNumber,
        request: &CompletionRequest,
    ) -> Result<String, SummarizeError> {
        debug!(round, kind = request.kind.as_str(), "requesting round summary");

        let result = match self.params.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.completion.generate(request))
                .await
                .unwrap_or(Err(CompletionError::Timeout)),
            None => self.completion.generate(request).await,
        };

        let text = result.map_err(|source| SummarizeError::CompletionFailure { round, source })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SummarizeError::CompletionFailure {
                round,
                source: CompletionError::MalformedResponse("empty summary".to_string()),
            });
        }
        Ok(text.to_string())
    }
}
