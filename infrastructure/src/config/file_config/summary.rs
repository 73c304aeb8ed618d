//! Summary configuration from TOML (`[summary]` section)
//!
//! ```toml
//! [summary]
//! max_tokens = 150
//! degraded_max_tokens = 100
//! request_timeout_seconds = 60
//! fallback = "raw-tail:2"      # or "sentinel"
//! raw_tail_max_chars = 280
//! ```

use super::validation::ConfigIssue;
use council_application::SummaryParams;
use council_domain::FallbackStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSummaryConfig {
    pub max_tokens: u32,
    pub degraded_max_tokens: u32,
    /// Per-request timeout in seconds (0 = rely on the HTTP client timeout)
    pub request_timeout_seconds: u64,
    /// `"sentinel"` or `"raw-tail:N"`
    pub fallback: String,
    pub raw_tail_max_chars: usize,
}

impl Default for FileSummaryConfig {
    fn default() -> Self {
        let params = SummaryParams::default();
        Self {
            max_tokens: params.max_output_tokens,
            degraded_max_tokens: params.degraded_max_output_tokens,
            request_timeout_seconds: params.request_timeout.map_or(0, |t| t.as_secs()),
            fallback: params.fallback.to_string(),
            raw_tail_max_chars: params.raw_tail_max_chars,
        }
    }
}

impl FileSummaryConfig {
    /// Parse the fallback strategy, falling back to the sentinel on error.
    pub fn parse_fallback(&self) -> (FallbackStrategy, Vec<ConfigIssue>) {
        match self.fallback.parse::<FallbackStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(e) => (
                FallbackStrategy::Sentinel,
                vec![ConfigIssue::warning(
                    "summary.fallback",
                    format!("{}, using 'sentinel'", e),
                )],
            ),
        }
    }

    /// Convert to [`SummaryParams`], reporting values that were replaced.
    pub fn to_params(&self) -> (SummaryParams, Vec<ConfigIssue>) {
        let defaults = SummaryParams::default();
        let (fallback, mut issues) = self.parse_fallback();

        let max_output_tokens = if self.max_tokens == 0 {
            issues.push(ConfigIssue::warning(
                "summary.max_tokens",
                format!("must be positive, using {}", defaults.max_output_tokens),
            ));
            defaults.max_output_tokens
        } else {
            self.max_tokens
        };

        let degraded_max_output_tokens = if self.degraded_max_tokens == 0 {
            issues.push(ConfigIssue::warning(
                "summary.degraded_max_tokens",
                format!(
                    "must be positive, using {}",
                    defaults.degraded_max_output_tokens
                ),
            ));
            defaults.degraded_max_output_tokens
        } else {
            self.degraded_max_tokens
        };

        if degraded_max_output_tokens > max_output_tokens {
            issues.push(ConfigIssue::warning(
                "summary.degraded_max_tokens",
                "the degraded retry budget is larger than the primary budget",
            ));
        }

        let params = SummaryParams {
            max_output_tokens,
            degraded_max_output_tokens,
            request_timeout: (self.request_timeout_seconds > 0)
                .then(|| Duration::from_secs(self.request_timeout_seconds)),
            fallback,
            raw_tail_max_chars: self.raw_tail_max_chars.max(1),
        };
        (params, issues)
    }
}
