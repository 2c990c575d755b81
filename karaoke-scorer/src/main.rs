//! karaoke-scorer - Singing similarity scoring CLI
//!
//! Scores one or more sung recordings against a reference track and prints
//! the result. Resolves configuration, runs the synchronous pipeline on a
//! blocking worker, and maps pipeline errors to exit codes.
//!
//! **Exit codes:**
//! - 0: every candidate scored
//! - 1: configuration or runtime failure
//! - 2: decode error
//! - 3: sample rate mismatch
//! - 4: alignment error
//! - 5: undefined similarity

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use karaoke_common::config::{load_config, parse_log_level, resolve_root_folder};
use karaoke_scorer::config::{resolve_scoring_settings, ScoringOverrides};
use karaoke_scorer::{FsAudioStore, ScoreReport, ScoringError, ScoringErrorKind, ScoringPipeline};

/// Command-line arguments for karaoke-scorer
#[derive(Parser, Debug)]
#[command(name = "karaoke-scorer")]
#[command(about = "Score sung recordings against a reference track")]
#[command(version)]
struct Args {
    /// Reference track identifier (relative to the root folder)
    reference: String,

    /// Candidate recording identifiers (relative to the root folder)
    #[arg(required = true)]
    candidates: Vec<String>,

    /// TOML config file (default: <config dir>/karaoke/karaoke-scorer.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder that identifiers are resolved against
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Analysis window length in samples
    #[arg(long)]
    window_size: Option<usize>,

    /// Distance between window starts in samples
    #[arg(long)]
    hop_size: Option<usize>,

    /// Fail when truncation drops more than this fraction of windows (0-1)
    #[arg(long)]
    max_length_gap: Option<f64>,

    /// Overall deadline for scoring, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

/// Rendered scoring failure
#[derive(Debug, Clone, Serialize)]
struct Failure {
    kind: ScoringErrorKind,
    message: String,
}

impl From<ScoringError> for Failure {
    fn from(e: ScoringError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Score outcome for one candidate
type Outcome = (String, Result<ScoreReport, Failure>);

fn main() -> ExitCode {
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    let code = match runtime.block_on(run(args)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    };

    // Do not wait for a blocking scoring task abandoned by the deadline
    runtime.shutdown_background();
    code
}

async fn run(args: Args) -> Result<ExitCode> {
    let toml_config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&toml_config.logging.level)?;

    info!(
        "Starting karaoke-scorer v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let store = FsAudioStore::new(resolve_root_folder(args.root_folder.as_deref(), &toml_config));
    info!("Root folder: {}", store.root().display());

    let overrides = ScoringOverrides {
        window_size: args.window_size,
        hop_size: args.hop_size,
        max_length_gap: args.max_length_gap,
    };
    let settings = resolve_scoring_settings(&overrides, &toml_config.scoring)
        .context("Invalid scoring parameters")?;

    let pipeline = ScoringPipeline::new(
        Arc::new(store),
        settings.envelope,
        settings.length_policy,
    );

    let reference = args.reference.clone();
    let candidates = args.candidates.clone();
    let task = tokio::task::spawn_blocking(move || score_all(&pipeline, &reference, candidates));

    let outcomes = with_deadline(task, args.timeout_secs.map(Duration::from_secs)).await?;

    if args.json {
        println!("{}", render_json(&args.reference, &outcomes)?);
    } else {
        print_plain(&outcomes);
    }

    Ok(ExitCode::from(exit_status(&outcomes)))
}

/// Await a scoring task, failing once `deadline` elapses
///
/// The task itself keeps running; the runtime is shut down without waiting.
async fn with_deadline<T>(task: JoinHandle<T>, deadline: Option<Duration>) -> Result<T> {
    let joined = match deadline {
        Some(deadline) => tokio::time::timeout(deadline, task)
            .await
            .with_context(|| format!("Scoring did not finish within {} seconds", deadline.as_secs()))?,
        None => task.await,
    };
    joined.context("Scoring task failed")
}

/// Install the fmt subscriber on stderr
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(configured_level: &str) -> Result<()> {
    let level = parse_log_level(configured_level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to initialize tracing")?;
    Ok(())
}

/// Score every candidate; a single candidate skips the batch machinery
fn score_all(pipeline: &ScoringPipeline, reference: &str, candidates: Vec<String>) -> Vec<Outcome> {
    if let [candidate] = candidates.as_slice() {
        let result = pipeline
            .evaluate_detailed(reference, candidate)
            .map_err(Failure::from);
        return vec![(candidate.clone(), result)];
    }

    match pipeline.evaluate_batch(reference, candidates.as_slice()) {
        Ok(results) => candidates
            .into_iter()
            .zip(results)
            .map(|(candidate, result)| (candidate, result.map_err(Failure::from)))
            .collect(),
        Err(e) => {
            // Reference failed to decode: every candidate shares the failure
            let failure = Failure::from(e);
            candidates
                .into_iter()
                .map(|candidate| (candidate, Err(failure.clone())))
                .collect()
        }
    }
}

fn print_plain(outcomes: &[Outcome]) {
    for (candidate, result) in outcomes {
        match result {
            Ok(report) => println!("{}\t{}", candidate, report.score),
            Err(failure) => eprintln!("{}\terror ({}): {}", candidate, failure.kind, failure.message),
        }
    }
}

fn render_json(reference: &str, outcomes: &[Outcome]) -> Result<String> {
    let results: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(candidate, result)| match result {
            Ok(report) => json!({
                "candidate": candidate,
                "report": report,
            }),
            Err(failure) => json!({
                "candidate": candidate,
                "error": failure,
            }),
        })
        .collect();

    let document = json!({
        "reference": reference,
        "results": results,
    });
    serde_json::to_string_pretty(&document).context("Failed to serialize results")
}

/// Exit status of the first failing candidate, 0 when all succeeded
fn exit_status(outcomes: &[Outcome]) -> u8 {
    outcomes
        .iter()
        .find_map(|(_, result)| result.as_ref().err())
        .map(|failure| error_code(failure.kind))
        .unwrap_or(0)
}

fn error_code(kind: ScoringErrorKind) -> u8 {
    match kind {
        ScoringErrorKind::Decode => 2,
        ScoringErrorKind::SampleRateMismatch => 3,
        ScoringErrorKind::Alignment => 4,
        ScoringErrorKind::UndefinedSimilarity => 5,
    }
}
