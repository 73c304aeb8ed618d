//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application parameters
//! with `to_params`, which also reports values it had to replace.

mod completion;
mod deliberation;
mod output;
mod summary;
mod validation;

pub use completion::FileCompletionConfig;
pub use deliberation::FileDeliberationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use summary::FileSummaryConfig;
pub use validation::{ConfigIssue, Severity};

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round count, budgets, default participants
    pub deliberation: FileDeliberationConfig,
    /// Round summary budgets and fallback
    pub summary: FileSummaryConfig,
    /// Completion API settings
    pub completion: FileCompletionConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.deliberation.to_params().1);
        issues.extend(self.summary.to_params().1);

        if self.completion.model.trim().is_empty() {
            issues.push(ConfigIssue::error("completion.model", "model must not be empty"));
        }
        if self.completion.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "completion.timeout_seconds",
                "HTTP timeout must be positive",
            ));
        }
        if self.completion.api_key.is_some() {
            issues.push(ConfigIssue::warning(
                "completion.api_key",
                format!(
                    "API key stored in the config file; prefer the {} environment variable",
                    self.completion.api_key_env
                ),
            ));
        }

        issues
    }
}
