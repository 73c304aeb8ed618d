//! Rolling context fed to participants.

use crate::core::error::DomainError;
use crate::deliberation::round::{Round, RoundNumber};
use crate::summary::value_objects::Summary;

/// What participants see before contributing (Entity)
///
/// Holds the summaries of earlier rounds, oldest first, plus the full
/// contributions of a single round: the most recently closed one. Full detail
/// for at most one round is ever held; everything older is represented only
/// by its [`Summary`].
///
/// Summaries must arrive in strictly increasing round order with no gaps.
#[derive(Debug, Clone, Default)]
pub struct DeliberationContext {
    summaries: Vec<Summary>,
    latest_round: Option<Round>,
}

impl DeliberationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.latest_round.as_ref()
    }

    /// Round whose summary must be appended next.
    pub fn next_summary_round(&self) -> RoundNumber {
        self.summaries.last().map_or(1, |s| s.round_number + 1)
    }

    /// Append the next summary.
    pub fn push_summary(&mut self, summary: Summary) -> Result<(), DomainError> {
        let expected = self.next_summary_round();
        if summary.round_number != expected {
            return Err(DomainError::SummaryOutOfOrder {
                expected,
                got: summary.round_number,
            });
        }
        if let Some(latest) = &self.latest_round
            && summary.round_number >= latest.number()
        {
            // The full-detail round is never summarized in place
            return Err(DomainError::SummaryOutOfOrder {
                expected: latest.number().saturating_sub(1),
                got: summary.round_number,
            });
        }
        self.summaries.push(summary);
        Ok(())
    }

    /// Replace the full-detail round with a newer closed round.
    pub fn advance(&mut self, round: Round) -> Result<(), DomainError> {
        if !round.is_closed() {
            return Err(DomainError::RoundOpen(round.number()));
        }
        if let Some(current) = &self.latest_round
            && round.number() <= current.number()
        {
            return Err(DomainError::StaleRound {
                current: current.number(),
                got: round.number(),
            });
        }
        self.latest_round = Some(round);
        Ok(())
    }

    /// True when any summary in the context is a fallback.
    pub fn has_degraded_summaries(&self) -> bool {
        self.summaries.iter().any(Summary::is_degraded_context)
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty() && self.latest_round.is_none()
    }

    /// Render the context as prompt text.
    pub fn render(&self) -> String {
        let mut text = String::new();

        if !self.summaries.is_empty() {
            text.push_str("Earlier rounds (summarized):\n");
            for summary in &self.summaries {
                text.push_str(&format!(
                    "\n--- Round {} summary ---\n{}\n",
                    summary.round_number, summary.text
                ));
            }
        }

        if let Some(round) = &self.latest_round {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&format!("Previous round (round {}), in full:\n", round.number()));
            for contribution in round.contributions() {
                text.push_str(&format!(
                    "\n--- {} ---\n{}\n",
                    contribution.participant_id(),
                    contribution.text()
                ));
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::contribution::Contribution;

    fn closed_round(number: RoundNumber) -> Round {
        let mut round = Round::new(number, 2).unwrap();
        round
            .push(Contribution::new("a", format!("a in {}", number), number))
            .unwrap();
        round
            .push(Contribution::new("b", format!("b in {}", number), number))
            .unwrap();
        round
    }

    #[test]
    fn test_empty_context() {
        let context = DeliberationContext::new();
        assert!(context.is_empty());
        assert_eq!(context.next_summary_round(), 1);
        assert_eq!(context.render(), "");
    }

    #[test]
    fn test_summaries_in_order() {
        let mut context = DeliberationContext::new();
        context.advance(closed_round(3)).unwrap();
        context.push_summary(Summary::ready(1, "one")).unwrap();
        context.push_summary(Summary::ready(2, "two")).unwrap();
        assert_eq!(context.next_summary_round(), 3);
        let rounds: Vec<_> = context.summaries().iter().map(|s| s.round_number).collect();
        assert_eq!(rounds, vec![1, 2]);
    }

    #[test]
    fn test_summary_gap_rejected() {
        let mut context = DeliberationContext::new();
        assert_eq!(
            context.push_summary(Summary::ready(2, "two")),
            Err(DomainError::SummaryOutOfOrder {
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn test_summary_of_full_detail_round_rejected() {
        let mut context = DeliberationContext::new();
        context.advance(closed_round(1)).unwrap();
        assert!(context.push_summary(Summary::ready(1, "one")).is_err());
    }

    #[test]
    fn test_advance_keeps_single_full_round() {
        let mut context = DeliberationContext::new();
        context.advance(closed_round(1)).unwrap();
        context.advance(closed_round(2)).unwrap();
        assert_eq!(context.latest_round().unwrap().number(), 2);
        let rendered = context.render();
        assert!(rendered.contains("a in 2"));
        assert!(!rendered.contains("a in 1"));
    }

    #[test]
    fn test_advance_rejects_open_and_stale_rounds() {
        let mut context = DeliberationContext::new();
        let open = Round::new(1, 2).unwrap();
        assert_eq!(context.advance(open), Err(DomainError::RoundOpen(1)));

        context.advance(closed_round(2)).unwrap();
        assert_eq!(
            context.advance(closed_round(2)),
            Err(DomainError::StaleRound { current: 2, got: 2 })
        );
    }

    #[test]
    fn test_render_marks_degraded() {
        let mut context = DeliberationContext::new();
        context.advance(closed_round(3)).unwrap();
        context.push_summary(Summary::ready(1, "one")).unwrap();
        context.push_summary(Summary::unavailable(2)).unwrap();
        assert!(context.has_degraded_summaries());
        let rendered = context.render();
        assert!(rendered.contains("--- Round 1 summary ---\none"));
        assert!(rendered.contains("[round summary unavailable]"));
        assert!(rendered.contains("Previous round (round 3), in full:"));
    }
}
