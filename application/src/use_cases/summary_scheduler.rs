//! Summary Scheduler
//!
//! Owns the background summarization tasks of one deliberation session.
//!
//! When a round closes, [`SummaryScheduler::on_round_closed`] launches a
//! [`RoundSummarizer`] task and returns immediately. The driver later reads
//! the result through [`SummaryScheduler::get_summary`], the only read path.
//!
//! # Lag invariant
//!
//! The summary of round N is first needed when assembling context for round
//! N+2, i.e. after round N+1 has closed. That leaves one full round of
//! wall-clock time for the background task, so `get_summary` normally
//! returns a finished summary without suspending. Reading earlier is a
//! [`ContractViolation::PrematureRead`]. When `get_summary` does have to
//! wait, the observer is told via
//! [`SummaryObserver::on_summary_suspended`].
//!
//! # Slot lifecycle
//!
//! ```text
//! (not started) -> Pending -> Ready
//!                          -> Failed -> Degraded | Unavailable
//! ```
//!
//! A failed primary attempt is followed by exactly one retry with the
//! degraded template, inside the same background task. If that fails too
//! the slot resolves to `Unavailable` with the fallback text. The final
//! round is never summarized.
//!
//! # Teardown
//!
//! [`SummaryScheduler::shutdown`] (also run on drop) cancels in-flight
//! tasks, marks their slots `Unavailable`, and makes the slot table
//! read-only. Results arriving afterwards are discarded. Cancelling the
//! parent token has the same effect: each task resolves its slot to
//! `Unavailable`, and the next scheduler call tears the table down.

use crate::ports::completion::CompletionService;
use crate::ports::summary_observer::{NoSummaryObserver, SummaryObserver, SummaryRecord};
use crate::use_cases::summarize_round::RoundSummarizer;
use council_domain::util::char_count;
use council_domain::{Contribution, Question, RoundNumber, Summary, SummaryStatus};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Caller bugs against the scheduler contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("round {0} was already closed")]
    AlreadyClosed(RoundNumber),

    #[error("round {got} closed out of order (expected round {expected})")]
    OutOfOrder {
        expected: RoundNumber,
        got: RoundNumber,
    },

    #[error("round {round} is outside this deliberation (1..={total_rounds})")]
    RoundOutOfRange {
        round: RoundNumber,
        total_rounds: RoundNumber,
    },

    #[error("round {0} closed with no contributions")]
    EmptyRound(RoundNumber),

    #[error("no summary is scheduled for round {0}")]
    NotScheduled(RoundNumber),

    #[error("summary for round {round} requested before round {} closed", .round + 1)]
    PrematureRead { round: RoundNumber },

    #[error("deliberation still in progress ({closed} of {total_rounds} rounds closed)")]
    DeliberationInProgress {
        closed: RoundNumber,
        total_rounds: RoundNumber,
    },
}

/// Errors returned by the scheduler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("Deliberation was torn down")]
    Cancelled,
}

type SummaryFuture = Shared<BoxFuture<'static, Summary>>;

struct Slot {
    status: SummaryStatus,
    resolved: Option<Summary>,
    task: SummaryFuture,
}

#[derive(Default)]
struct SlotTable {
    slots: BTreeMap<RoundNumber, Slot>,
    highest_closed: RoundNumber,
    torn_down: bool,
}

impl SlotTable {
    fn mark_failed(&mut self, round: RoundNumber) {
        if self.torn_down {
            return;
        }
        if let Some(slot) = self.slots.get_mut(&round)
            && slot.status == SummaryStatus::Pending
        {
            slot.status = SummaryStatus::Failed;
        }
    }

    /// Mark every unresolved slot `Unavailable` and refuse further writes.
    /// Returns the number of slots cancelled.
    fn tear_down(&mut self) -> usize {
        self.torn_down = true;
        let mut cancelled = 0;
        for (round, slot) in self.slots.iter_mut() {
            if slot.resolved.is_none() {
                slot.status = SummaryStatus::Unavailable;
                slot.resolved = Some(Summary::unavailable(*round));
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Write-once per slot. Returns `false` if the slot was already resolved
    /// or the session is torn down.
    fn resolve(&mut self, summary: Summary) -> bool {
        if self.torn_down {
            return false;
        }
        match self.slots.get_mut(&summary.round_number) {
            Some(slot) if slot.resolved.is_none() => {
                slot.status = summary.status;
                slot.resolved = Some(summary);
                true
            }
            _ => false,
        }
    }
}

fn lock(table: &Mutex<SlotTable>) -> MutexGuard<'_, SlotTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Background summary pipeline for one deliberation session
///
/// Must be used from within a Tokio runtime: `on_round_closed` spawns.
pub struct SummaryScheduler<C: CompletionService + ?Sized + 'static> {
    summarizer: RoundSummarizer<C>,
    table: Arc<Mutex<SlotTable>>,
    observer: Arc<dyn SummaryObserver>,
    cancellation: CancellationToken,
    total_rounds: RoundNumber,
    problem: Option<Question>,
}

impl<C: CompletionService + ?Sized + 'static> SummaryScheduler<C> {
    pub fn new(summarizer: RoundSummarizer<C>, total_rounds: RoundNumber) -> Self {
        Self {
            summarizer,
            table: Arc::new(Mutex::new(SlotTable::default())),
            observer: Arc::new(NoSummaryObserver),
            cancellation: CancellationToken::new(),
            total_rounds,
            problem: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SummaryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Problem statement passed to the round 1 summary.
    pub fn with_problem(mut self, problem: Question) -> Self {
        self.problem = Some(problem);
        self
    }

    /// Cancel in-flight summaries when `parent` is cancelled.
    pub fn with_parent_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancellation = parent.child_token();
        self
    }

    pub fn total_rounds(&self) -> RoundNumber {
        self.total_rounds
    }

    /// Current slot status, `None` if no summary was ever scheduled.
    pub fn status(&self, round: RoundNumber) -> Option<SummaryStatus> {
        lock(&self.table).slots.get(&round).map(|slot| slot.status)
    }

    /// Number of slots without a final summary.
    pub fn in_flight(&self) -> usize {
        lock(&self.table)
            .slots
            .values()
            .filter(|slot| slot.resolved.is_none())
            .count()
    }

    /// Record that `round` closed and launch its summary in the background.
    ///
    /// Never blocks. Rounds must close exactly once and in order. The final
    /// round is recorded but not summarized.
    pub fn on_round_closed(
        &self,
        round: RoundNumber,
        contributions: Vec<Contribution>,
    ) -> Result<(), SchedulerError> {
        let mut table = lock(&self.table);
        self.ensure_live(&mut table)?;

        if round == 0 || round > self.total_rounds {
            return Err(self.violation(ContractViolation::RoundOutOfRange {
                round,
                total_rounds: self.total_rounds,
            }));
        }
        if round <= table.highest_closed {
            return Err(self.violation(ContractViolation::AlreadyClosed(round)));
        }
        if round != table.highest_closed + 1 {
            return Err(self.violation(ContractViolation::OutOfOrder {
                expected: table.highest_closed + 1,
                got: round,
            }));
        }
        if contributions.is_empty() {
            return Err(self.violation(ContractViolation::EmptyRound(round)));
        }

        table.highest_closed = round;

        if round == self.total_rounds {
            debug!(round, "final round closed; not summarized");
            return Ok(());
        }

        let job = SlotJob {
            summarizer: self.summarizer.clone(),
            table: Arc::clone(&self.table),
            observer: Arc::clone(&self.observer),
            cancellation: self.cancellation.clone(),
            problem: if round == 1 { self.problem.clone() } else { None },
            round,
            contributions,
        };
        let handle = tokio::spawn(job.run());
        let task = async move {
            match handle.await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(round, "summary task aborted: {}", e);
                    Summary::unavailable(round)
                }
            }
        }
        .boxed()
        .shared();

        // Inserted under the same lock the task needs to commit, so the task
        // can never resolve a slot that does not exist yet.
        table.slots.insert(
            round,
            Slot {
                status: SummaryStatus::Pending,
                resolved: None,
                task,
            },
        );
        info!(round, "round closed; summary scheduled");
        Ok(())
    }

    /// The summary of `round`.
    ///
    /// Returns immediately when the slot is resolved. Otherwise suspends until
    /// the background task finishes and reports the suspension. Never fails
    /// because summarization failed: that case yields the fallback summary.
    pub async fn get_summary(&self, round: RoundNumber) -> Result<Summary, SchedulerError> {
        let task = {
            let mut table = lock(&self.table);
            self.ensure_live(&mut table)?;
            if table.highest_closed < self.total_rounds && round >= table.highest_closed {
                return Err(self.violation(ContractViolation::PrematureRead { round }));
            }
            let Some(slot) = table.slots.get(&round) else {
                return Err(self.violation(ContractViolation::NotScheduled(round)));
            };
            if let Some(summary) = &slot.resolved {
                return Ok(summary.clone());
            }
            slot.task.clone()
        };

        debug!(round, "round summary not ready; suspending driver");
        let started = Instant::now();
        let summary = task.await;
        self.observer.on_summary_suspended(round, started.elapsed());

        lock(&self.table).resolve(summary.clone());
        Ok(summary)
    }

    /// Every summary in round order. Only valid once the final round closed.
    pub async fn collect_all(&self) -> Result<Vec<Summary>, SchedulerError> {
        let rounds: Vec<RoundNumber> = {
            let mut table = lock(&self.table);
            self.ensure_live(&mut table)?;
            if table.highest_closed < self.total_rounds {
                return Err(self.violation(ContractViolation::DeliberationInProgress {
                    closed: table.highest_closed,
                    total_rounds: self.total_rounds,
                }));
            }
            table.slots.keys().copied().collect()
        };

        let mut summaries = Vec::with_capacity(rounds.len());
        for round in rounds {
            summaries.push(self.get_summary(round).await?);
        }
        Ok(summaries)
    }

    /// Tear the session down: cancel in-flight tasks, mark their slots
    /// `Unavailable`, refuse further writes. Idempotent.
    pub fn shutdown(&self) {
        let cancelled = {
            let mut table = lock(&self.table);
            if table.torn_down {
                return;
            }
            table.tear_down()
        };
        self.cancellation.cancel();

        if cancelled > 0 {
            info!(cancelled, "summary scheduler shut down; in-flight summaries cancelled");
        } else {
            debug!("summary scheduler shut down");
        }
    }

    /// Fails once torn down. A cancelled parent token tears the table down
    /// on first contact.
    fn ensure_live(&self, table: &mut SlotTable) -> Result<(), SchedulerError> {
        if !table.torn_down && self.cancellation.is_cancelled() {
            let cancelled = table.tear_down();
            info!(cancelled, "deliberation cancelled; summary scheduler torn down");
        }
        if table.torn_down {
            return Err(SchedulerError::Cancelled);
        }
        Ok(())
    }

    fn violation(&self, violation: ContractViolation) -> SchedulerError {
        error!("summary scheduler contract violation: {}", violation);
        SchedulerError::ContractViolation(violation)
    }
}

impl<C: CompletionService + ?Sized + 'static> Drop for SummaryScheduler<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Everything one background summarization task owns.
struct SlotJob<C: CompletionService + ?Sized + 'static> {
    summarizer: RoundSummarizer<C>,
    table: Arc<Mutex<SlotTable>>,
    observer: Arc<dyn SummaryObserver>,
    cancellation: CancellationToken,
    problem: Option<Question>,
    round: RoundNumber,
    contributions: Vec<Contribution>,
}

impl<C: CompletionService + ?Sized + 'static> SlotJob<C> {
    async fn run(self) -> Summary {
        let round = self.round;
        let started = Instant::now();

        let produced = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => None,
            summary = self.produce() => Some(summary),
        };

        let Some(summary) = produced else {
            let summary = Summary::unavailable(round);
            lock(&self.table).resolve(summary.clone());
            debug!(round, "summarization cancelled; result discarded");
            return summary;
        };

        if lock(&self.table).resolve(summary.clone()) {
            let input_chars = self.contributions.iter().map(Contribution::char_count).sum();
            self.observer.on_summary_complete(&SummaryRecord::new(
                round,
                input_chars,
                char_count(&summary.text),
                started.elapsed(),
                summary.status,
            ));
        } else {
            debug!(round, "deliberation torn down; orphaned summary discarded");
        }
        summary
    }

    async fn produce(&self) -> Summary {
        let round = self.round;

        match self
            .summarizer
            .summarize(round, &self.contributions, self.problem.as_ref())
            .await
        {
            Ok(text) => return Summary::ready(round, text),
            Err(e) if e.is_cancelled() => return self.fallback(),
            Err(e) => warn!(round, "round summary failed, retrying with degraded prompt: {}", e),
        }

        lock(&self.table).mark_failed(round);

        match self
            .summarizer
            .summarize_degraded(round, &self.contributions)
            .await
        {
            Ok(text) => Summary::degraded(round, text),
            Err(e) => {
                warn!(round, "degraded retry failed; summary unavailable: {}", e);
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Summary {
        let params = self.summarizer.params();
        Summary::unavailable_with_text(
            self.round,
            params
                .fallback
                .render(&self.contributions, params.raw_tail_max_chars),
        )
    }
}
