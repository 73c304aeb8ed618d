//! Deliberation configuration from TOML (`[deliberation]` section)
//!
//! ```toml
//! [deliberation]
//! rounds = 5
//! contribution_max_tokens = 400
//! timeout_seconds = 900        # 0 disables the overall timeout
//!
//! [[deliberation.participants]]
//! id = "economist"
//! persona = "You weigh costs and incentives."
//! ```

use super::validation::ConfigIssue;
use council_application::DeliberationParams;
use council_domain::Participant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// Number of rounds
    pub rounds: u32,
    /// Output budget per contribution
    pub contribution_max_tokens: u32,
    /// Whole-deliberation timeout in seconds (0 = none)
    pub timeout_seconds: u64,
    /// Default participants, used when none are given on the command line
    pub participants: Vec<Participant>,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        let params = DeliberationParams::default();
        Self {
            rounds: params.total_rounds,
            contribution_max_tokens: params.contribution_max_output_tokens,
            timeout_seconds: params
                .deliberation_timeout
                .map_or(0, |timeout| timeout.as_secs()),
            participants: Vec::new(),
        }
    }
}

impl FileDeliberationConfig {
    /// Convert to [`DeliberationParams`], reporting values that were replaced.
    pub fn to_params(&self) -> (DeliberationParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let defaults = DeliberationParams::default();

        let total_rounds = if self.rounds == 0 {
            issues.push(ConfigIssue::error(
                "deliberation.rounds",
                "a deliberation needs at least one round",
            ));
            defaults.total_rounds
        } else {
            self.rounds
        };

        let contribution_max_output_tokens = if self.contribution_max_tokens == 0 {
            issues.push(ConfigIssue::warning(
                "deliberation.contribution_max_tokens",
                format!(
                    "must be positive, using {}",
                    defaults.contribution_max_output_tokens
                ),
            ));
            defaults.contribution_max_output_tokens
        } else {
            self.contribution_max_tokens
        };

        for (index, participant) in self.participants.iter().enumerate() {
            if participant.id.as_str().trim().is_empty() {
                issues.push(ConfigIssue::error(
                    format!("deliberation.participants[{}].id", index),
                    "participant id must not be empty",
                ));
            }
        }

        let params = DeliberationParams {
            total_rounds,
            contribution_max_output_tokens,
            deliberation_timeout: (self.timeout_seconds > 0)
                .then(|| Duration::from_secs(self.timeout_seconds)),
        };
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_params() {
        let (params, issues) = FileDeliberationConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params, DeliberationParams::default());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = FileDeliberationConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.to_params().0.deliberation_timeout.is_none());
    }

    #[test]
    fn test_zero_rounds_is_error() {
        let config = FileDeliberationConfig {
            rounds: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.total_rounds, 5);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_participants_deserialize() {
        let toml_str = r#"
rounds = 3

[[participants]]
id = "economist"
persona = "You weigh costs."

[[participants]]
id = "engineer"
"#;
        let config: FileDeliberationConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.participants.len(), 2);
        assert_eq!(config.participants[0].persona, "You weigh costs.");
        assert!(config.participants[1].persona.is_empty());
    }
}
