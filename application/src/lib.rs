//! Application layer for council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, SummaryParams};
pub use ports::{
    completion::{CompletionError, CompletionRequest, CompletionService, RequestKind},
    progress::{DeliberationProgress, NoProgress},
    summary_observer::{
        CompositeSummaryObserver, NoSummaryObserver, SummaryCounters, SummaryObserver,
        SummaryRecord, TracingSummaryObserver,
    },
};
pub use use_cases::run_deliberation::{
    RunDeliberationError, RunDeliberationInput, RunDeliberationUseCase,
};
pub use use_cases::summarize_round::{RoundSummarizer, SummarizeError};
pub use use_cases::summary_scheduler::{ContractViolation, SchedulerError, SummaryScheduler};
