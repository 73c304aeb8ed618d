//! Prompt templates for deliberation rounds and round summaries

use crate::deliberation::contribution::Contribution;
use crate::deliberation::round::RoundNumber;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a participant, built around its persona
    pub fn participant_system(persona: &str) -> String {
        let mut system = String::from(
            r#"You are a participant in a multi-round deliberation with other experts.
Each round you see summaries of earlier rounds and the full text of the previous round.
Build on, challenge, or refine what others said. Be concrete and concise.
Do not repeat points that have already been settled."#,
        );
        if !persona.trim().is_empty() {
            system.push_str("\n\nYour role in this deliberation:\n");
            system.push_str(persona.trim());
        }
        system
    }

    /// User prompt for one participant's contribution to a round
    pub fn contribution_prompt(
        question: &str,
        round: RoundNumber,
        total_rounds: RoundNumber,
        context: &str,
    ) -> String {
        let mut prompt = format!(
            "Problem under deliberation:\n{}\n\nThis is round {} of {}.\n",
            question, round, total_rounds
        );

        if context.trim().is_empty() {
            prompt.push_str("\nNo earlier rounds yet. Give your opening position.\n");
        } else {
            prompt.push('\n');
            prompt.push_str(context);
        }

        if round == total_rounds {
            prompt.push_str(
                "\nThis is the final round. State your final position and the reasons for it.",
            );
        } else {
            prompt.push_str("\nGive your contribution for this round.");
        }

        prompt
    }

    /// System prompt for round summarization
    pub fn summary_system() -> &'static str {
        r#"You compress one round of a multi-party deliberation into a short summary.
The summary replaces the full round text in later rounds, so keep every distinct position,
every point of agreement, and every open disagreement. Attribute positions to participants.
Write 100 to 150 tokens of plain prose. No preamble, no headings."#
    }

    /// User prompt for round summarization
    ///
    /// The problem statement is only included for round 1, where it grounds
    /// the first summary; later summaries build on earlier ones.
    pub fn summary_prompt(
        round: RoundNumber,
        contributions: &[Contribution],
        problem: Option<&str>,
    ) -> String {
        let mut prompt = String::new();

        if round == 1
            && let Some(problem) = problem
        {
            prompt.push_str(&format!("Problem under deliberation:\n{}\n\n", problem));
        }

        prompt.push_str(&format!("Contributions in round {}:\n", round));
        for c in contributions {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", c.participant_id(), c.text()));
        }

        prompt.push_str(&format!("\nSummarize round {}.", round));
        prompt
    }

    /// System prompt for the degraded (retry) summarization
    pub fn degraded_summary_system() -> &'static str {
        "Summarize the contributions below in under 100 tokens. Plain prose."
    }

    /// User prompt for the degraded (retry) summarization
    ///
    /// Same contributions as [`summary_prompt`](Self::summary_prompt), less
    /// framing.
    pub fn degraded_summary_prompt(round: RoundNumber, contributions: &[Contribution]) -> String {
        let mut prompt = format!("Round {}:\n", round);
        for c in contributions {
            prompt.push_str(&format!("{}: {}\n", c.participant_id(), c.text()));
        }
        prompt
    }
}
