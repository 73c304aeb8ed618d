//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`SummaryParams`]: summary length budgets, request timeout, fallback text
//! - [`DeliberationParams`]: round count, contribution budget, overall timeout

pub mod deliberation_params;
pub mod summary_params;

pub use deliberation_params::DeliberationParams;
pub use summary_params::SummaryParams;
