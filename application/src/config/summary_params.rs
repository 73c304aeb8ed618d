//! Summary parameters: round summarizer and scheduler control.

use council_domain::FallbackStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round summarization parameters.
///
/// Used by [`RoundSummarizer`](crate::use_cases::summarize_round::RoundSummarizer)
/// for request budgets and by
/// [`SummaryScheduler`](crate::use_cases::summary_scheduler::SummaryScheduler)
/// for the fallback text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryParams {
    /// Output budget for the primary summary request (target 100-150 tokens).
    pub max_output_tokens: u32,
    /// Output budget for the degraded retry request.
    pub degraded_max_output_tokens: u32,
    /// Per-request timeout enforced on top of the adapter's own timeout.
    pub request_timeout: Option<Duration>,
    /// Text used when both attempts fail.
    pub fallback: FallbackStrategy,
    /// Character cap for each raw excerpt in [`FallbackStrategy::RawTail`].
    pub raw_tail_max_chars: usize,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 150,
            degraded_max_output_tokens: 100,
            request_timeout: Some(Duration::from_secs(60)),
            fallback: FallbackStrategy::Sentinel,
            raw_tail_max_chars: 280,
        }
    }
}

impl SummaryParams {
    // ==================== Builder Methods ====================

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn with_degraded_max_output_tokens(mut self, tokens: u32) -> Self {
        self.degraded_max_output_tokens = tokens;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_raw_tail_max_chars(mut self, chars: usize) -> Self {
        self.raw_tail_max_chars = chars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = SummaryParams::default();
        assert_eq!(params.max_output_tokens, 150);
        assert!(params.degraded_max_output_tokens < params.max_output_tokens);
        assert_eq!(params.fallback, FallbackStrategy::Sentinel);
        assert!(params.request_timeout.is_some());
    }

    #[test]
    fn test_builder() {
        let params = SummaryParams::default()
            .with_max_output_tokens(120)
            .with_fallback(FallbackStrategy::RawTail { contributions: 2 })
            .with_request_timeout(None);

        assert_eq!(params.max_output_tokens, 120);
        assert_eq!(params.fallback, FallbackStrategy::RawTail { contributions: 2 });
        assert!(params.request_timeout.is_none());
    }
}
