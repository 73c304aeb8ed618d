//! Deliberation domain
//!
//! Participants contribute once per round. A closed round is handed to the
//! summary pipeline, and the [`context::DeliberationContext`] keeps later
//! rounds bounded: summaries for old rounds, full detail for one.

pub mod context;
pub mod contribution;
pub mod outcome;
pub mod round;
