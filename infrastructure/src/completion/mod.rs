//! Completion service adapters
//!
//! Implements the [`CompletionService`](council_application::CompletionService)
//! port over HTTP.

mod anthropic;

pub use anthropic::{AnthropicCompletionService, CompletionSettings, CompletionSetupError};
