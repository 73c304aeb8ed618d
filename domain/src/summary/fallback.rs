//! What an unavailable summary contains.

use crate::core::error::DomainError;
use crate::deliberation::contribution::Contribution;
use crate::summary::value_objects::SUMMARY_UNAVAILABLE;
use crate::util::excerpt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Text substituted for a round whose summarization failed permanently.
///
/// Either way the text starts with [`SUMMARY_UNAVAILABLE`], so consumers can
/// always tell it apart from a real summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Sentinel text only
    #[default]
    Sentinel,
    /// Sentinel header followed by the last `contributions` raw contributions
    RawTail { contributions: usize },
}

impl FallbackStrategy {
    /// Render the fallback text for a failed round.
    ///
    /// `max_chars` caps each raw excerpt.
    pub fn render(&self, contributions: &[Contribution], max_chars: usize) -> String {
        match self {
            FallbackStrategy::Sentinel => SUMMARY_UNAVAILABLE.to_string(),
            FallbackStrategy::RawTail { contributions: k } => {
                let skip = contributions.len().saturating_sub(*k);
                let tail = &contributions[skip..];
                if tail.is_empty() {
                    return SUMMARY_UNAVAILABLE.to_string();
                }

                let mut text = format!(
                    "{}\nLast {} raw contribution(s):",
                    SUMMARY_UNAVAILABLE,
                    tail.len()
                );
                for c in tail {
                    text.push_str(&format!(
                        "\n- {}: {}",
                        c.participant_id(),
                        excerpt(c.text(), max_chars)
                    ));
                }
                text
            }
        }
    }
}

/// Parses `sentinel` or `raw-tail:<k>`.
impl FromStr for FallbackStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "sentinel" {
            return Ok(FallbackStrategy::Sentinel);
        }
        let count = s
            .strip_prefix("raw-tail:")
            .or_else(|| s.strip_prefix("raw_tail:"))
            .ok_or_else(|| DomainError::InvalidFallback(s.clone()))?;
        let contributions: usize = count
            .parse()
            .map_err(|_| DomainError::InvalidFallback(s.clone()))?;
        if contributions == 0 {
            return Err(DomainError::InvalidFallback(
                "raw-tail needs at least one contribution".to_string(),
            ));
        }
        Ok(FallbackStrategy::RawTail { contributions })
    }
}

impl std::fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackStrategy::Sentinel => write!(f, "sentinel"),
            FallbackStrategy::RawTail { contributions } => write!(f, "raw-tail:{}", contributions),
        }
    }
}
