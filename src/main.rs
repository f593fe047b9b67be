//! Autosuggest Explorer main entry point
//!
//! This is the command-line driver: it starts a job and keeps stepping it
//! until every candidate has been processed, then writes the export.

use anyhow::{bail, Context};
use autosuggest_explorer::config::{load_config_with_hash, Config};
use autosuggest_explorer::export::{export_file_name, print_summary};
use autosuggest_explorer::{CandidateEnumerator, JobController, JobError, StepStatus};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Number of candidates listed by --dry-run
const DRY_RUN_PREVIEW: usize = 5;

/// Autosuggest Explorer: maps how autocomplete completes a word
///
/// Appends every one- or two-letter suffix from the configured alphabet to a
/// base word, collects the autocomplete suggestions for each candidate and
/// clusters the search results behind every suggestion by domain.
#[derive(Parser, Debug)]
#[command(name = "autosuggest-explorer")]
#[command(version)]
#[command(about = "Explores autocomplete suggestions for a base word", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Base word to extend
    #[arg(short, long)]
    word: String,

    /// Number of letters appended to the base word (1 or 2)
    #[arg(short, long, default_value_t = 1)]
    letters: u8,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the candidates without querying anything
    #[arg(long)]
    dry_run: bool,

    /// CSV output file (defaults to a timestamped file in the output directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write a markdown report to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config, &cli.word, cli.letters);
    }

    handle_run(&config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("autosuggest_explorer=info,warn"),
            1 => EnvFilter::new("autosuggest_explorer=debug,info"),
            2 => EnvFilter::new("autosuggest_explorer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates inputs and previews the candidates
fn handle_dry_run(config: &Config, word: &str, letters: u8) -> anyhow::Result<()> {
    println!("=== Autosuggest Explorer Dry Run ===\n");

    println!("Job Configuration:");
    println!("  Alphabet: {} letters", config.job.letters().len());
    println!("  Separator: {:?}", config.job.separator);
    println!("  Max suggestions per candidate: {}", config.job.max_suggestions);
    println!(
        "  Minimum request interval: {}ms",
        config.job.min_request_interval_ms
    );

    println!("\nEndpoints:");
    println!("  Suggest: {}", config.endpoints.suggest_url);
    println!("  Search: {}", config.endpoints.search_url);
    println!("  Language: {}", config.endpoints.language);

    let enumerator = CandidateEnumerator::new(
        word,
        letters,
        &config.job.letters(),
        &config.job.separator,
    )?;

    println!("\nCandidates ({}):", enumerator.len());
    for candidate in enumerator.iter().take(DRY_RUN_PREVIEW) {
        println!("  - {}", candidate);
    }
    if enumerator.len() > DRY_RUN_PREVIEW {
        println!("  ... and {} more", enumerator.len() - DRY_RUN_PREVIEW);
    }

    // One suggest call per candidate is the floor; every suggestion adds a search call
    let floor = Duration::from_millis(config.job.min_request_interval_ms)
        * u32::try_from(enumerator.len()).unwrap_or(u32::MAX);
    println!("\n✓ Configuration is valid");
    println!("✓ Would take at least {:?} at the configured pace", floor);

    Ok(())
}

/// Runs a job to completion and writes its export
async fn handle_run(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let controller = JobController::from_config(config)?;
    let total = controller.start(&cli.word, cli.letters).await?;
    tracing::info!("Processing {} candidates", total);

    tokio::select! {
        result = drive(&controller, config) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, cancelling job");
            print_summary(&controller.summary().await);
            controller.cancel().await;
            return Ok(());
        }
    }

    let bytes = controller.export().await?;
    let output = cli.output.clone().unwrap_or_else(|| {
        Path::new(&config.output.directory).join(export_file_name(
            "suggestions",
            "csv",
            &chrono::Local::now(),
        ))
    });
    tokio::fs::write(&output, bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!("Results exported to: {}", output.display());

    if let Some(report_path) = &cli.summary {
        let title = format!("Suggestions for \"{}\"", cli.word.trim());
        controller.write_report(&title, report_path).await?;
        tracing::info!("Report written to: {}", report_path.display());
    }

    if !cli.quiet {
        print_summary(&controller.summary().await);
    }

    Ok(())
}

/// Keeps stepping the job until it completes
///
/// Rate limiting makes the driver back off; repeated failures of the same
/// candidate eventually abort the run.
async fn drive(controller: &JobController, config: &Config) -> anyhow::Result<()> {
    let backoff = Duration::from_secs(config.job.rate_limit_backoff_secs);
    let max_failures = config.job.max_consecutive_failures;

    loop {
        let failure = match controller.advance_step().await {
            Ok(report) => match report.status {
                StepStatus::Complete => return Ok(()),
                StepStatus::Running => continue,
                StepStatus::NotRunning => bail!("job stopped before completion"),
            },
            Err(err @ (JobError::TransientError(_) | JobError::RateLimited(_))) => err,
            Err(err) => return Err(err.into()),
        };

        let snapshot = controller.snapshot().await;
        if snapshot.consecutive_failures >= max_failures {
            bail!(
                "giving up at {}/{} after {} consecutive failures: {}",
                snapshot.cursor,
                snapshot.total,
                snapshot.consecutive_failures,
                failure
            );
        }

        if matches!(failure, JobError::RateLimited(_)) {
            tracing::warn!("Rate limited, backing off for {:?}", backoff);
            tokio::time::sleep(backoff).await;
        }
    }
}
