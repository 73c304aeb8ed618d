//! Summary value objects.
//!
//! - [`SummaryStatus`] - lifecycle of one round's summary slot
//! - [`Summary`] - bounded-length compression of one round's contributions

use crate::deliberation::round::RoundNumber;
use crate::util::char_count;
use serde::{Deserialize, Serialize};

/// Placeholder text used when a round could not be summarized.
///
/// Kept in brackets so it can never be mistaken for model output.
pub const SUMMARY_UNAVAILABLE: &str = "[round summary unavailable]";

/// Average characters per token used for [`estimate_tokens`].
const CHARS_PER_TOKEN: usize = 4;

/// Rough token count for `text` (`ceil(chars / 4)`).
pub fn estimate_tokens(text: &str) -> usize {
    char_count(text).div_ceil(CHARS_PER_TOKEN)
}

/// State of a round's summary.
///
/// ```text
/// Pending -> Ready
///         -> Failed -> Degraded      (degraded retry succeeded)
///                   -> Unavailable   (retry failed, or cancelled)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    /// Summarization task launched, not yet resolved
    Pending,
    /// Primary summarization succeeded
    Ready,
    /// Primary attempt failed; the degraded retry is in flight
    Failed,
    /// The degraded retry produced the summary
    Degraded,
    /// No summary could be produced; the text is the sentinel (or a raw excerpt)
    Unavailable,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Pending => "pending",
            SummaryStatus::Ready => "ready",
            SummaryStatus::Failed => "failed",
            SummaryStatus::Degraded => "degraded",
            SummaryStatus::Unavailable => "unavailable",
        }
    }

    /// `Ready`, `Degraded` and `Unavailable` never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SummaryStatus::Ready | SummaryStatus::Degraded | SummaryStatus::Unavailable
        )
    }
}

impl std::fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bounded-length compression of one round (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub round_number: RoundNumber,
    pub text: String,
    pub token_estimate: usize,
    pub status: SummaryStatus,
}

impl Summary {
    fn with_status(round_number: RoundNumber, text: String, status: SummaryStatus) -> Self {
        Self {
            round_number,
            token_estimate: estimate_tokens(&text),
            text,
            status,
        }
    }

    /// Summary produced by the primary request.
    pub fn ready(round_number: RoundNumber, text: impl Into<String>) -> Self {
        Self::with_status(round_number, text.into(), SummaryStatus::Ready)
    }

    /// Summary produced by the shorter retry request.
    pub fn degraded(round_number: RoundNumber, text: impl Into<String>) -> Self {
        Self::with_status(round_number, text.into(), SummaryStatus::Degraded)
    }

    /// Sentinel summary for a round that could not be summarized.
    pub fn unavailable(round_number: RoundNumber) -> Self {
        Self::with_status(
            round_number,
            SUMMARY_UNAVAILABLE.to_string(),
            SummaryStatus::Unavailable,
        )
    }

    /// Unavailable summary carrying fallback text (e.g. a raw excerpt).
    ///
    /// The text must start with [`SUMMARY_UNAVAILABLE`]; see
    /// [`FallbackStrategy::render`](super::fallback::FallbackStrategy::render).
    pub fn unavailable_with_text(round_number: RoundNumber, text: impl Into<String>) -> Self {
        Self::with_status(round_number, text.into(), SummaryStatus::Unavailable)
    }

    /// True when the text is exactly the sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.text == SUMMARY_UNAVAILABLE
    }

    /// True when downstream context built from this summary is lower quality
    /// than a genuine summary.
    pub fn is_degraded_context(&self) -> bool {
        self.status == SummaryStatus::Unavailable || self.text.starts_with(SUMMARY_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_ready_summary() {
        let summary = Summary::ready(1, "Participants agreed on X.");
        assert_eq!(summary.status, SummaryStatus::Ready);
        assert_eq!(summary.token_estimate, estimate_tokens("Participants agreed on X."));
        assert!(!summary.is_sentinel());
        assert!(!summary.is_degraded_context());
    }

    #[test]
    fn test_unavailable_is_sentinel() {
        let summary = Summary::unavailable(4);
        assert_eq!(summary.round_number, 4);
        assert_eq!(summary.text, SUMMARY_UNAVAILABLE);
        assert!(summary.is_sentinel());
        assert!(summary.is_degraded_context());
    }

    #[test]
    fn test_degraded_is_not_degraded_context() {
        // Degraded summaries are real model output, just from the shorter prompt
        let summary = Summary::degraded(2, "Short recap.");
        assert!(!summary.is_degraded_context());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SummaryStatus::Pending.is_terminal());
        assert!(!SummaryStatus::Failed.is_terminal());
        assert!(SummaryStatus::Ready.is_terminal());
        assert!(SummaryStatus::Degraded.is_terminal());
        assert!(SummaryStatus::Unavailable.is_terminal());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&SummaryStatus::Unavailable).unwrap();
        assert_eq!(json, "\"unavailable\"");
    }
}
