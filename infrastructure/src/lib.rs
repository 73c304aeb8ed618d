//! Infrastructure layer for council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod completion;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use completion::{AnthropicCompletionService, CompletionSettings, CompletionSetupError};
pub use config::{
    ConfigIssue, ConfigLoader, FileCompletionConfig, FileConfig, FileDeliberationConfig,
    FileOutputConfig, FileOutputFormat, FileSummaryConfig, Severity,
};
pub use logging::JsonlSummaryLog;
