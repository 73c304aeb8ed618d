//! Deliberation parameters: driver loop control.

use council_domain::RoundNumber;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deliberation loop control parameters.
///
/// Used by [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Number of rounds; the last one is never summarized.
    pub total_rounds: RoundNumber,
    /// Output budget for each participant contribution.
    pub contribution_max_output_tokens: u32,
    /// Whole-deliberation timeout. On expiry in-flight summaries are cancelled.
    pub deliberation_timeout: Option<Duration>,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            total_rounds: 5,
            contribution_max_output_tokens: 400,
            deliberation_timeout: Some(Duration::from_secs(15 * 60)),
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_total_rounds(mut self, rounds: RoundNumber) -> Self {
        self.total_rounds = rounds;
        self
    }

    pub fn with_contribution_max_output_tokens(mut self, tokens: u32) -> Self {
        self.contribution_max_output_tokens = tokens;
        self
    }

    pub fn with_deliberation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.deliberation_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DeliberationParams::default();
        assert_eq!(params.total_rounds, 5);
        assert_eq!(params.contribution_max_output_tokens, 400);
        assert!(params.deliberation_timeout.is_some());
    }

    #[test]
    fn test_builder() {
        let params = DeliberationParams::default()
            .with_total_rounds(7)
            .with_deliberation_timeout(None);
        assert_eq!(params.total_rounds, 7);
        assert!(params.deliberation_timeout.is_none());
    }
}
