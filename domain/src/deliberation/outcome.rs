//! Result of a complete deliberation.

use crate::deliberation::round::{Round, RoundNumber};
use crate::summary::value_objects::{Summary, SummaryStatus};
use serde::{Deserialize, Serialize};

/// Complete result of a deliberation (Value Object)
///
/// `rounds` is the full transcript; `summaries` holds one entry per
/// non-final round, in round order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationOutcome {
    /// The problem statement
    pub question: String,
    /// Participant identifiers, in query order
    pub participants: Vec<String>,
    /// Every closed round
    pub rounds: Vec<Round>,
    /// Round summaries (the final round is never summarized)
    pub summaries: Vec<Summary>,
}

impl DeliberationOutcome {
    pub fn new(
        question: impl Into<String>,
        participants: Vec<String>,
        rounds: Vec<Round>,
        summaries: Vec<Summary>,
    ) -> Self {
        Self {
            question: question.into(),
            participants,
            rounds,
            summaries,
        }
    }

    /// The last round, whose contributions are the deliberation's conclusion.
    pub fn final_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Rounds whose summary fell back to sentinel or raw text.
    pub fn degraded_rounds(&self) -> Vec<RoundNumber> {
        self.summaries
            .iter()
            .filter(|s| s.is_degraded_context())
            .map(|s| s.round_number)
            .collect()
    }

    /// Number of summaries with the given status.
    pub fn count_status(&self, status: SummaryStatus) -> usize {
        self.summaries.iter().filter(|s| s.status == status).count()
    }
}
