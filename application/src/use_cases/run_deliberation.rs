//! Run Deliberation use case
//!
//! Drives a fixed number of rounds. Each round queries every participant in
//! parallel with the rolling context, closes the round, and hands it to the
//! [`SummaryScheduler`]. Summaries are consumed two rounds later.

use crate::config::{DeliberationParams, SummaryParams};
use crate::ports::completion::{CompletionError, CompletionRequest, CompletionService, RequestKind};
use crate::ports::progress::{DeliberationProgress, NoProgress};
use crate::ports::summary_observer::{NoSummaryObserver, SummaryObserver};
use crate::use_cases::summarize_round::RoundSummarizer;
use crate::use_cases::summary_scheduler::{SchedulerError, SummaryScheduler};
use council_domain::{
    Contribution, DeliberationContext, DeliberationOutcome, DomainError, Participant,
    ParticipantId, PromptTemplate, Question, Round, RoundNumber,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a deliberation
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("No participants configured")]
    NoParticipants,

    #[error("A deliberation needs at least one round")]
    NoRounds,

    #[error("Every participant failed in round {round}")]
    AllParticipantsFailed { round: RoundNumber },

    #[error("Deliberation cancelled")]
    Cancelled,

    #[error("Deliberation timed out")]
    TimedOut,

    #[error("Summary scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    /// The problem under deliberation
    pub question: Question,
    /// Participants, in query order
    pub participants: Vec<Participant>,
    pub params: DeliberationParams,
    pub summary: SummaryParams,
}

impl RunDeliberationInput {
    pub fn new(question: impl Into<Question>, participants: Vec<Participant>) -> Self {
        Self {
            question: question.into(),
            participants,
            params: DeliberationParams::default(),
            summary: SummaryParams::default(),
        }
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_summary_params(mut self, summary: SummaryParams) -> Self {
        self.summary = summary;
        self
    }
}

/// Use case for running a multi-round deliberation
pub struct RunDeliberationUseCase<C: CompletionService + 'static> {
    completion: Arc<C>,
    observer: Arc<dyn SummaryObserver>,
    cancellation: CancellationToken,
}

impl<C: CompletionService + 'static> RunDeliberationUseCase<C> {
    pub fn new(completion: Arc<C>) -> Self {
        Self {
            completion,
            observer: Arc::new(NoSummaryObserver),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SummaryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Abort the deliberation (and every in-flight summary) when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDeliberationInput,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        if input.participants.is_empty() {
            return Err(RunDeliberationError::NoParticipants);
        }
        if input.params.total_rounds == 0 {
            return Err(RunDeliberationError::NoRounds);
        }

        info!(
            "Starting deliberation: {} participants, {} rounds",
            input.participants.len(),
            input.params.total_rounds
        );

        // One scheduler per session; dropped (and torn down) with it
        let scheduler = SummaryScheduler::new(
            RoundSummarizer::new(Arc::clone(&self.completion), input.summary.clone()),
            input.params.total_rounds,
        )
        .with_observer(Arc::clone(&self.observer))
        .with_problem(input.question.clone())
        .with_parent_cancellation(&self.cancellation);

        let run = async {
            match input.params.deliberation_timeout {
                Some(limit) => tokio::time::timeout(limit, self.deliberate(&input, &scheduler, progress))
                    .await
                    .unwrap_or_else(|_| {
                        warn!("Deliberation exceeded {:?}", limit);
                        Err(RunDeliberationError::TimedOut)
                    }),
                None => self.deliberate(&input, &scheduler, progress).await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(RunDeliberationError::Cancelled),
            result = run => result,
        };

        if let Err(e) = &result {
            warn!("Deliberation aborted: {}", e);
            scheduler.shutdown();
        }
        result
    }

    async fn deliberate(
        &self,
        input: &RunDeliberationInput,
        scheduler: &SummaryScheduler<C>,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        let total_rounds = input.params.total_rounds;
        let mut context = DeliberationContext::new();
        let mut rounds = Vec::with_capacity(total_rounds as usize);

        for number in 1..=total_rounds {
            // Round N's summary is due once round N+1 has closed
            for due in context.next_summary_round()..=number.saturating_sub(2) {
                let summary = scheduler.get_summary(due).await?;
                if summary.is_degraded_context() {
                    debug!(round = due, "using fallback text for round summary");
                }
                context.push_summary(summary)?;
            }

            let round = self.run_round(input, number, &context, progress).await?;
            scheduler.on_round_closed(number, round.contributions().to_vec())?;
            progress.on_round_complete(number);

            context.advance(round.clone())?;
            rounds.push(round);
        }

        let summaries = scheduler.collect_all().await?;
        progress.on_deliberation_complete(total_rounds);
        info!(
            "Deliberation complete: {} rounds, {} summaries",
            rounds.len(),
            summaries.len()
        );

        Ok(DeliberationOutcome::new(
            input.question.content(),
            input
                .participants
                .iter()
                .map(|p| p.id.to_string())
                .collect(),
            rounds,
            summaries,
        ))
    }

    /// Query all participants in parallel and close the round
    async fn run_round(
        &self,
        input: &RunDeliberationInput,
        number: RoundNumber,
        context: &DeliberationContext,
        progress: &dyn DeliberationProgress,
    ) -> Result<Round, RunDeliberationError> {
        let total_rounds = input.params.total_rounds;
        info!("Round {}/{}", number, total_rounds);
        progress.on_round_start(number, total_rounds, input.participants.len());

        let context_text = context.render();
        let mut join_set = JoinSet::new();

        for (index, participant) in input.participants.iter().enumerate() {
            let completion = Arc::clone(&self.completion);
            let id = participant.id.clone();
            let request = CompletionRequest::new(
                RequestKind::Contribution,
                PromptTemplate::participant_system(&participant.persona),
                PromptTemplate::contribution_prompt(
                    input.question.content(),
                    number,
                    total_rounds,
                    &context_text,
                ),
                input.params.contribution_max_output_tokens,
            );

            join_set.spawn(async move {
                let result = Self::query_participant(&completion, &request).await;
                (index, id, result)
            });
        }

        let mut answers: Vec<(usize, ParticipantId, Result<String, CompletionError>)> =
            Vec::with_capacity(input.participants.len());
        let mut lost = 0;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, id, result)) => {
                    if let Err(e) = &result {
                        warn!("Participant {} failed in round {}: {}", id, number, e);
                    }
                    progress.on_contribution(number, &id, result.is_ok());
                    answers.push((index, id, result));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    lost += 1;
                }
            }
        }

        // Contributions keep participant order regardless of arrival order
        answers.sort_by_key(|(index, _, _)| *index);

        let mut round = Round::new(number, input.participants.len())?;
        for (_, id, result) in answers {
            match result {
                Ok(text) => {
                    round.push(Contribution::new(id, text, number))?;
                }
                Err(_) => {
                    round.withdraw()?;
                }
            }
        }
        for _ in 0..lost {
            round.withdraw()?;
        }

        if !round.is_closed() {
            return Err(RunDeliberationError::AllParticipantsFailed { round: number });
        }
        Ok(round)
    }

    async fn query_participant(
        completion: &C,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let text = completion.generate(request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CompletionError::MalformedResponse(
                "empty contribution".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}
