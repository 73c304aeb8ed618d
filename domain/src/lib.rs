//! Domain layer for council
//!
//! This crate contains the core entities and value objects of a multi-round
//! deliberation. It has no dependencies on infrastructure or async runtimes.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! Every active participant contributes once per [`Round`]. A round closes
//! when its last expected [`Contribution`] arrives and is never reopened.
//!
//! ## Rolling context
//!
//! Participants do not see the whole transcript. The [`DeliberationContext`]
//! holds a [`Summary`] per older round plus the full text of the most recent
//! round only, so prompt size stays bounded however long the deliberation runs.

pub mod core;
pub mod deliberation;
pub mod prompt;
pub mod summary;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, question::Question};
pub use deliberation::{
    context::DeliberationContext,
    contribution::{Contribution, Participant, ParticipantId},
    outcome::DeliberationOutcome,
    round::{Round, RoundNumber},
};
pub use prompt::PromptTemplate;
pub use summary::{
    fallback::FallbackStrategy,
    value_objects::{SUMMARY_UNAVAILABLE, Summary, SummaryStatus, estimate_tokens},
};
