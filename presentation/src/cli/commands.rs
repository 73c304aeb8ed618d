//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::{FallbackStrategy, Participant};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round in full, with its summary
    Full,
    /// Round summaries and the final round only
    Summaries,
    /// JSON output
    Json,
}

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Multi-round LLM deliberation with rolling round summaries")]
#[command(long_about = r#"
Council runs a fixed number of deliberation rounds between LLM participants.

Each round every participant sees:
  - a short summary of every round older than the previous one
  - the previous round in full

Round summaries are produced in the background and are normally ready
before they are needed. If summarizing a round fails twice, the round is
represented by "[round summary unavailable]" (or a raw excerpt, see
--fallback) and the deliberation continues.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_SUMMARY__MAX_TOKENS=120)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council/config.toml   Global config

Example:
  council "Should we migrate to a monorepo?" -p "pm:You own the roadmap" -p "sre:You run production"
  council -r 7 --fallback raw-tail:2 -o summaries "Pick a vendor for payments"
"#)]
pub struct Cli {
    /// The problem to deliberate on
    pub problem: Option<String>,

    /// Participant as `id` or `id:persona` (repeatable)
    #[arg(short, long, value_name = "ID[:PERSONA]")]
    pub participant: Vec<Participant>,

    /// Number of rounds
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: Option<u32>,

    /// Text used when a round cannot be summarized: `sentinel` or `raw-tail:N`
    #[arg(long, value_name = "STRATEGY")]
    pub fallback: Option<FallbackStrategy>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Append summary metrics as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub metrics_log: Option<PathBuf>,

    /// Write tracing output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_participants_and_fallback() {
        let cli = Cli::try_parse_from([
            "council",
            "Pick a vendor",
            "-p",
            "economist:You weigh costs.",
            "-p",
            "engineer",
            "-r",
            "7",
            "--fallback",
            "raw-tail:2",
            "-o",
            "summaries",
        ])
        .unwrap();

        assert_eq!(cli.problem.as_deref(), Some("Pick a vendor"));
        assert_eq!(cli.participant.len(), 2);
        assert_eq!(cli.participant[0].persona, "You weigh costs.");
        assert_eq!(cli.participant[1].id.as_str(), "engineer");
        assert_eq!(cli.rounds, Some(7));
        assert_eq!(cli.fallback, Some(FallbackStrategy::RawTail { contributions: 2 }));
        assert_eq!(cli.output, Some(OutputFormat::Summaries));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(Cli::try_parse_from(["council", "q", "-r", "0"]).is_err());
    }

    #[test]
    fn test_bad_fallback_rejected() {
        assert!(Cli::try_parse_from(["council", "q", "--fallback", "raw-tail:0"]).is_err());
    }
}
