//! Progress reporting for deliberation rounds

use colored::Colorize;
use council_application::DeliberationProgress;
use council_domain::{ParticipantId, RoundNumber};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a deliberation with one bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationProgress for ProgressReporter {
    fn on_round_start(&self, round: RoundNumber, total_rounds: RoundNumber, participants: usize) {
        let pb = self.multi.add(ProgressBar::new(participants as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}/{}", round, total_rounds));
        pb.set_message("Waiting for contributions...");

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_contribution(&self, _round: RoundNumber, participant: &ParticipantId, success: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), participant)
            } else {
                format!("{} {}", "x".red(), participant)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: RoundNumber) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{}", format!("Round {} closed", round).green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DeliberationProgress for SimpleProgress {
    fn on_round_start(&self, round: RoundNumber, total_rounds: RoundNumber, participants: usize) {
        println!(
            "{} {} ({} participants)",
            "->".cyan(),
            format!("Round {}/{}", round, total_rounds).bold(),
            participants
        );
    }

    fn on_contribution(&self, _round: RoundNumber, participant: &ParticipantId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), participant);
        } else {
            println!("  {} {} (failed)", "x".red(), participant);
        }
    }

    fn on_round_complete(&self, _round: RoundNumber) {
        println!();
    }

    fn on_deliberation_complete(&self, total_rounds: RoundNumber) {
        println!("{} {} rounds complete", "->".cyan(), total_rounds);
    }
}
