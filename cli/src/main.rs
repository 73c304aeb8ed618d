//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    CompositeSummaryObserver, RunDeliberationInput, RunDeliberationUseCase, SummaryCounters,
    TracingSummaryObserver,
};
use council_domain::Question;
use council_infrastructure::{
    AnthropicCompletionService, CompletionSettings, ConfigIssue, ConfigLoader, FileConfig,
    FileOutputFormat, JsonlSummaryLog,
};
use council_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&cli)?;

    info!("Starting council");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    check_config(&config)?;

    let problem = match cli.problem.as_deref() {
        Some(p) => Question::try_new(p)?,
        None => bail!("A problem statement is required. See --help."),
    };

    let participants = if cli.participant.is_empty() {
        config.deliberation.participants.clone()
    } else {
        cli.participant.clone()
    };
    if participants.is_empty() {
        bail!("No participants. Pass -p ID[:PERSONA] or set [[deliberation.participants]].");
    }

    let (mut params, _) = config.deliberation.to_params();
    if let Some(rounds) = cli.rounds {
        params = params.with_total_rounds(rounds);
    }
    let (mut summary_params, _) = config.summary.to_params();
    if let Some(fallback) = cli.fallback {
        summary_params = summary_params.with_fallback(fallback);
    }

    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Summaries) => OutputFormat::Summaries,
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Full) | None => OutputFormat::Full,
    });
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let settings = CompletionSettings::from_config(&config.completion)?;
    let completion = Arc::new(AnthropicCompletionService::new(settings)?);
    info!("Using model {}", completion.model());

    let counters = Arc::new(SummaryCounters::new());
    let mut observer = CompositeSummaryObserver::new()
        .with(Arc::new(TracingSummaryObserver))
        .with(counters.clone());
    if let Some(path) = cli.metrics_log.as_ref().or(config.output.metrics_log.as_ref()) {
        match JsonlSummaryLog::new(path) {
            Some(log) => observer = observer.with(Arc::new(log)),
            None => warn!("Summary metrics will not be written to {}", path.display()),
        }
    }

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; cancelling deliberation");
                token.cancel();
            }
        });
    }

    let use_case = RunDeliberationUseCase::new(completion)
        .with_observer(Arc::new(observer))
        .with_cancellation(cancellation);

    let input = RunDeliberationInput::new(problem, participants)
        .with_params(params)
        .with_summary_params(summary_params);

    // Progress bars would corrupt JSON on stdout
    let outcome = if cli.quiet || format == OutputFormat::Json {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    info!(
        ready = counters.ready(),
        degraded = counters.degraded(),
        unavailable = counters.unavailable(),
        suspensions = counters.suspensions(),
        "summary pipeline totals"
    );

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Summaries => ConsoleFormatter::format_summaries(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level: stderr always, plus
/// `--log-file` when given
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let (subscriber, guard) =
        logging_subscriber(cli.verbose, cli.log_file.as_deref(), std::io::stderr)?;
    subscriber.init();
    Ok(guard)
}

fn logging_subscriber<W>(
    verbose: u8,
    log_file: Option<&Path>,
    console: W,
) -> Result<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>)>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console_layer = fmt::layer().with_target(false).with_writer(console);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file must name a file: {}", path.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    Ok((subscriber, guard))
}

/// Report config issues; refuse to run on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        warn!("config {}", issue);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|issue| issue.is_error())
        .map(ConfigIssue::to_string)
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
