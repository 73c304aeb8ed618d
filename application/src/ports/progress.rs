//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{ParticipantId, RoundNumber};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait DeliberationProgress: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, round: RoundNumber, total_rounds: RoundNumber, participants: usize);

    /// Called when a participant's contribution arrives (or fails)
    fn on_contribution(&self, round: RoundNumber, participant: &ParticipantId, success: bool);

    /// Called when a round closes
    fn on_round_complete(&self, round: RoundNumber);

    /// Called once every round has closed and summaries are drained
    fn on_deliberation_complete(&self, _total_rounds: RoundNumber) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _round: RoundNumber, _total_rounds: RoundNumber, _participants: usize) {}
    fn on_contribution(&self, _round: RoundNumber, _participant: &ParticipantId, _success: bool) {}
    fn on_round_complete(&self, _round: RoundNumber) {}
}
