//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_deliberation;
pub mod summarize_round;
pub mod summary_scheduler;

#[cfg(test)]
pub(crate) mod test_support;
