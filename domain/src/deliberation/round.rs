//! Round entity

use crate::core::error::DomainError;
use crate::deliberation::contribution::Contribution;
use serde::{Deserialize, Serialize};

/// 1-based round index within a deliberation.
pub type RoundNumber = u32;

/// One pass in which every active participant contributes once (Entity)
///
/// A round has a fixed expected cardinality. It closes the instant the last
/// expected contribution arrives, and closure is one-way. A participant that
/// fails to contribute can be withdrawn, which lowers the expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    number: RoundNumber,
    expected: usize,
    contributions: Vec<Contribution>,
    closed: bool,
}

impl Round {
    pub fn new(number: RoundNumber, expected: usize) -> Result<Self, DomainError> {
        if number == 0 {
            return Err(DomainError::InvalidRoundNumber);
        }
        if expected == 0 {
            return Err(DomainError::NoExpectedParticipants { round: number });
        }
        Ok(Self {
            number,
            expected,
            contributions: Vec::with_capacity(expected),
            closed: false,
        })
    }

    pub fn number(&self) -> RoundNumber {
        self.number
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Total characters across all contributions.
    pub fn input_char_count(&self) -> usize {
        self.contributions.iter().map(Contribution::char_count).sum()
    }

    /// Append a contribution. Returns `true` if this closed the round.
    pub fn push(&mut self, contribution: Contribution) -> Result<bool, DomainError> {
        if self.closed {
            return Err(DomainError::RoundClosed(self.number));
        }
        if contribution.round_number() != self.number {
            return Err(DomainError::RoundMismatch {
                expected: self.number,
                got: contribution.round_number(),
            });
        }
        if self
            .contributions
            .iter()
            .any(|c| c.participant_id() == contribution.participant_id())
        {
            return Err(DomainError::DuplicateContribution {
                round: self.number,
                participant: contribution.participant_id().to_string(),
            });
        }

        self.contributions.push(contribution);
        self.update_closed();
        Ok(self.closed)
    }

    /// Drop one expected contribution (participant failed this round).
    ///
    /// Returns `true` if the round is now closed. A round whose every
    /// participant was withdrawn stays open and empty.
    pub fn withdraw(&mut self) -> Result<bool, DomainError> {
        if self.closed {
            return Err(DomainError::RoundClosed(self.number));
        }
        self.expected = self.expected.saturating_sub(1);
        self.update_closed();
        Ok(self.closed)
    }

    fn update_closed(&mut self) {
        self.closed = !self.contributions.is_empty() && self.contributions.len() >= self.expected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(participant: &str, round: RoundNumber) -> Contribution {
        Contribution::new(participant, format!("{} speaks", participant), round)
    }

    #[test]
    fn test_round_zero_rejected() {
        assert_eq!(Round::new(0, 3), Err(DomainError::InvalidRoundNumber));
    }

    #[test]
    fn test_round_closes_on_last_expected() {
        let mut round = Round::new(1, 3).unwrap();
        assert!(!round.push(contribution("a", 1)).unwrap());
        assert!(!round.push(contribution("b", 1)).unwrap());
        assert!(round.push(contribution("c", 1)).unwrap());
        assert!(round.is_closed());
        assert_eq!(round.contributions().len(), 3);
    }

    #[test]
    fn test_closed_round_rejects_more() {
        let mut round = Round::new(2, 1).unwrap();
        round.push(contribution("a", 2)).unwrap();
        assert_eq!(
            round.push(contribution("b", 2)),
            Err(DomainError::RoundClosed(2))
        );
        assert_eq!(round.withdraw(), Err(DomainError::RoundClosed(2)));
    }

    #[test]
    fn test_wrong_round_rejected() {
        let mut round = Round::new(2, 2).unwrap();
        assert_eq!(
            round.push(contribution("a", 3)),
            Err(DomainError::RoundMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let mut round = Round::new(1, 3).unwrap();
        round.push(contribution("a", 1)).unwrap();
        assert!(matches!(
            round.push(contribution("a", 1)),
            Err(DomainError::DuplicateContribution { .. })
        ));
    }

    #[test]
    fn test_withdraw_closes_round() {
        let mut round = Round::new(1, 3).unwrap();
        round.push(contribution("a", 1)).unwrap();
        round.push(contribution("b", 1)).unwrap();
        assert!(round.withdraw().unwrap());
        assert_eq!(round.expected(), 2);
    }

    #[test]
    fn test_all_withdrawn_stays_open() {
        let mut round = Round::new(1, 2).unwrap();
        assert!(!round.withdraw().unwrap());
        assert!(!round.withdraw().unwrap());
        assert!(!round.is_closed());
        assert!(round.is_empty());
    }

    #[test]
    fn test_input_char_count() {
        let mut round = Round::new(1, 2).unwrap();
        round.push(Contribution::new("a", "abc", 1)).unwrap();
        round.push(Contribution::new("b", "de", 1)).unwrap();
        assert_eq!(round.input_char_count(), 5);
    }
}
