//! Domain error types

use crate::deliberation::round::RoundNumber;
use thiserror::Error;

/// Domain-level errors
///
/// Every variant describes a caller mistake against a domain value
/// (a round, a summary sequence, a problem statement). None of them is a
/// transient runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Round numbers start at 1")]
    InvalidRoundNumber,

    #[error("Round {round} expects at least one participant")]
    NoExpectedParticipants { round: RoundNumber },

    #[error("Round {round} has no contributions")]
    EmptyRound { round: RoundNumber },

    #[error("Contribution for round {got} cannot be added to round {expected}")]
    RoundMismatch {
        expected: RoundNumber,
        got: RoundNumber,
    },

    #[error("Round {0} is already closed")]
    RoundClosed(RoundNumber),

    #[error("Round {0} is still open")]
    RoundOpen(RoundNumber),

    #[error("Participant {participant} already contributed to round {round}")]
    DuplicateContribution {
        round: RoundNumber,
        participant: String,
    },

    #[error("Summary for round {got} is out of order (expected round {expected})")]
    SummaryOutOfOrder {
        expected: RoundNumber,
        got: RoundNumber,
    },

    #[error("Round {got} cannot replace round {current} in the rolling context")]
    StaleRound {
        current: RoundNumber,
        got: RoundNumber,
    },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("Invalid fallback strategy: {0}")]
    InvalidFallback(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidRoundNumber.to_string(),
            "Round numbers start at 1"
        );
        assert_eq!(
            DomainError::SummaryOutOfOrder {
                expected: 2,
                got: 3
            }
            .to_string(),
            "Summary for round 3 is out of order (expected round 2)"
        );
    }
}
