//! Console output formatter for deliberation results

use colored::Colorize;
use council_domain::{DeliberationOutcome, Round, Summary, SummaryStatus};

/// Formats deliberation outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every round in full, each followed by its summary
    pub fn format(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Deliberation"));
        output.push('\n');
        output.push_str(&Self::preamble(outcome));

        for round in &outcome.rounds {
            let is_final = Some(round.number()) == outcome.final_round().map(Round::number);
            let title = if is_final {
                format!("Round {} (final)", round.number())
            } else {
                format!("Round {}", round.number())
            };
            output.push_str(&Self::section_header(&title));
            output.push_str(&Self::contributions(round));

            if let Some(summary) = Self::summary_for(outcome, round) {
                output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    "Summary".cyan().bold(),
                    Self::status_label(summary.status),
                    summary.text
                ));
            }
        }

        output.push_str(&Self::health(outcome));
        output.push_str(&Self::footer());
        output
    }

    /// Format summaries followed by the final round (concise output)
    pub fn format_summaries(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Council Deliberation ===".cyan().bold()
        ));
        output.push_str(&Self::preamble(outcome));

        if !outcome.summaries.is_empty() {
            output.push_str(&Self::section_header("Round summaries"));
            for summary in &outcome.summaries {
                output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    format!("Round {}", summary.round_number).yellow().bold(),
                    Self::status_label(summary.status),
                    summary.text
                ));
            }
        }

        if let Some(round) = outcome.final_round() {
            output.push_str(&Self::section_header(&format!(
                "Final positions (round {})",
                round.number()
            )));
            output.push_str(&Self::contributions(round));
        }

        output.push_str(&Self::health(outcome));
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DeliberationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    fn preamble(outcome: &DeliberationOutcome) -> String {
        format!(
            "{} {}\n\n{} {}\n",
            "Problem:".cyan().bold(),
            outcome.question,
            "Participants:".cyan().bold(),
            outcome.participants.join(", ")
        )
    }

    fn contributions(round: &Round) -> String {
        round
            .contributions()
            .iter()
            .map(|c| {
                format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", c.participant_id()).yellow().bold(),
                    c.text()
                )
            })
            .collect()
    }

    fn summary_for<'a>(outcome: &'a DeliberationOutcome, round: &Round) -> Option<&'a Summary> {
        outcome
            .summaries
            .iter()
            .find(|s| s.round_number == round.number())
    }

    fn status_label(status: SummaryStatus) -> String {
        let label = format!("[{}]", status);
        match status {
            SummaryStatus::Ready => label.green().to_string(),
            SummaryStatus::Degraded => label.yellow().to_string(),
            _ => label.red().to_string(),
        }
    }

    /// One line noting rounds whose summary fell back, empty if none did
    fn health(outcome: &DeliberationOutcome) -> String {
        let degraded = outcome.degraded_rounds();
        let retried = outcome.count_status(SummaryStatus::Degraded);
        if degraded.is_empty() && retried == 0 {
            return String::new();
        }

        let mut notes = Vec::new();
        if retried > 0 {
            notes.push(format!("{} summary(ies) from the degraded retry", retried));
        }
        if !degraded.is_empty() {
            let rounds: Vec<String> = degraded.iter().map(|r| r.to_string()).collect();
            notes.push(format!("no summary for round(s) {}", rounds.join(", ")));
        }
        format!("\n{} {}\n", "Note:".yellow().bold(), notes.join("; "))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Contribution, SUMMARY_UNAVAILABLE};

    fn round(number: u32) -> Round {
        let mut round = Round::new(number, 2).unwrap();
        round
            .push(Contribution::new("economist", format!("costs, round {}", number), number))
            .unwrap();
        round
            .push(Contribution::new("engineer", format!("latency, round {}", number), number))
            .unwrap();
        round
    }

    fn outcome() -> DeliberationOutcome {
        DeliberationOutcome::new(
            "Pick a vendor",
            vec!["economist".to_string(), "engineer".to_string()],
            vec![round(1), round(2), round(3)],
            vec![
                Summary::ready(1, "Both favour vendor A."),
                Summary::unavailable(2),
            ],
        )
    }

    #[test]
    fn test_full_format_contains_rounds_and_summaries() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&outcome());

        assert!(text.contains("Problem: Pick a vendor"));
        assert!(text.contains("Round 3 (final)"));
        assert!(text.contains("costs, round 1"));
        assert!(text.contains("Summary [ready]\nBoth favour vendor A."));
        assert!(text.contains(SUMMARY_UNAVAILABLE));
        assert!(text.contains("no summary for round(s) 2"));
    }

    #[test]
    fn test_summaries_format_omits_early_rounds() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_summaries(&outcome());

        assert!(text.contains("Both favour vendor A."));
        assert!(text.contains("Final positions (round 3)"));
        assert!(text.contains("latency, round 3"));
        assert!(!text.contains("costs, round 1"));
    }

    #[test]
    fn test_json_round_trips_outcome_fields() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&outcome())).unwrap();
        assert_eq!(json["question"], "Pick a vendor");
        assert_eq!(json["summaries"][1]["status"], "unavailable");
        assert_eq!(json["rounds"].as_array().unwrap().len(), 3);
    }
}
