//! Job controller - the pausable, single-step enumeration job
//!
//! The controller owns the one [`JobState`] and the collaborators a step
//! needs. It never drives itself: progress only happens while a caller keeps
//! invoking [`JobController::advance_step`].
//!
//! # Locking
//!
//! - `state` guards every read-modify-write of the job; it is never held
//!   across a network call, so Pause/Cancel/snapshots stay responsive
//! - `step_lock` serializes steps, so at most one candidate is in flight
//! - an in-flight step commits only if no Start/Cancel happened meanwhile

use crate::cluster::cluster_results;
use crate::config::{Config, JobConfig};
use crate::enumerate::{Candidate, CandidateEnumerator};
use crate::export::{summarize, write_csv, write_markdown_report, JobSummary};
use crate::fetch::{
    build_http_client, HttpResultFetcher, HttpSuggestionClient, ResultFetcher, SuggestionClient,
};
use crate::job::pacer::Pacer;
use crate::job::state::{
    ControlAck, JobSnapshot, JobState, JobStatus, StepReport, StepStart, SuggestionEntry,
};
use crate::{ExplorerError, FetchResult, JobError, JobResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Settings a controller needs to build and run jobs
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub alphabet: Vec<String>,
    pub separator: String,

    /// Only the first `max_suggestions` suggestions of a candidate are expanded
    pub max_suggestions: usize,

    pub min_request_interval: Duration,
}

impl JobSettings {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            alphabet: config.letters(),
            separator: config.separator.clone(),
            max_suggestions: config.max_suggestions,
            min_request_interval: Duration::from_millis(config.min_request_interval_ms),
        }
    }
}

/// Owner of the single enumeration job
pub struct JobController {
    settings: JobSettings,
    suggestions: Arc<dyn SuggestionClient>,
    results: Arc<dyn ResultFetcher>,
    state: Mutex<JobState>,
    step_lock: Mutex<()>,
    pacer: Pacer,
}

impl JobController {
    /// Creates a controller around the given collaborators
    pub fn new(
        settings: JobSettings,
        suggestions: Arc<dyn SuggestionClient>,
        results: Arc<dyn ResultFetcher>,
    ) -> Self {
        let pacer = Pacer::new(settings.min_request_interval);
        Self {
            settings,
            suggestions,
            results,
            state: Mutex::new(JobState::new()),
            step_lock: Mutex::new(()),
            pacer,
        }
    }

    /// Creates a controller talking to the HTTP endpoints named in `config`
    pub fn from_config(config: &Config) -> Result<Self, ExplorerError> {
        let client = build_http_client(&config.user_agent, &config.endpoints)?;
        let suggestions = HttpSuggestionClient::new(client.clone(), &config.endpoints)?;
        let results = HttpResultFetcher::new(client, &config.endpoints)?;

        Ok(Self::new(
            JobSettings::from_config(&config.job),
            Arc::new(suggestions),
            Arc::new(results),
        ))
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Starts a new job, replacing any existing one
    ///
    /// Returns the number of candidates to process. On `InvalidArgument` the
    /// existing job is left untouched.
    pub async fn start(&self, base_word: &str, suffix_length: u8) -> JobResult<usize> {
        let enumerator = CandidateEnumerator::new(
            base_word,
            suffix_length,
            &self.settings.alphabet,
            &self.settings.separator,
        )?;
        let total = enumerator.len();

        let mut state = self.state.lock().await;
        if matches!(state.status(), JobStatus::Running | JobStatus::Paused) {
            tracing::info!(
                "Replacing unfinished job at {}/{}",
                state.cursor(),
                state.total()
            );
        }
        state.start(enumerator);

        tracing::info!(
            "Started job for '{}' with {}-letter suffixes: {} candidates",
            base_word.trim(),
            suffix_length,
            total
        );
        Ok(total)
    }

    pub async fn pause(&self) -> JobResult<ControlAck> {
        let mut state = self.state.lock().await;
        let ack = state.pause()?;
        tracing::info!("Job paused at {}/{}", state.cursor(), state.total());
        Ok(ack)
    }

    pub async fn resume(&self) -> JobResult<ControlAck> {
        let mut state = self.state.lock().await;
        let ack = state.resume()?;
        tracing::info!("Job resumed at {}/{}", state.cursor(), state.total());
        Ok(ack)
    }

    /// Discards the job and all accumulated output
    pub async fn cancel(&self) -> ControlAck {
        let mut state = self.state.lock().await;
        if state.status() != JobStatus::Idle {
            tracing::info!(
                "Job cancelled at {}/{}, discarding {} processed candidates",
                state.cursor(),
                state.total(),
                state.processed().len()
            );
        }
        state.cancel()
    }

    pub async fn snapshot(&self) -> JobSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Processes the candidate at the cursor
    ///
    /// Returns a report with status NotRunning (nothing done) when the job is
    /// idle or paused, and Complete without doing work once every candidate
    /// is processed. A `TransientError` or `RateLimited` error leaves the
    /// cursor where it was, so the next call retries the same candidate.
    pub async fn advance_step(&self) -> JobResult<StepReport> {
        let _turn = self.step_lock.lock().await;

        let (epoch, candidate) = match self.state.lock().await.begin_step() {
            StepStart::Finished(report) => return Ok(report),
            StepStart::Work { epoch, candidate } => (epoch, candidate),
        };

        match self.process_candidate(&candidate).await {
            Ok(entries) => {
                let report = self.state.lock().await.commit_step(epoch, candidate, entries);
                tracing::info!(
                    "Progress: {}/{} ({} suggestions)",
                    report.progress,
                    report.total,
                    report.new_entries.len()
                );
                Ok(report)
            }
            Err(err) => {
                self.state.lock().await.record_failure(epoch);
                tracing::warn!("Step for '{}' failed: {}", candidate, err);
                Err(JobError::from(err))
            }
        }
    }

    /// Fetches suggestions for one candidate and the results behind each
    async fn process_candidate(&self, candidate: &Candidate) -> FetchResult<Vec<SuggestionEntry>> {
        self.pacer.wait_turn().await;
        let suggestions = self.suggestions.fetch(&candidate.text).await?;

        if suggestions.is_empty() {
            tracing::debug!("No suggestions for '{}'", candidate);
        }

        let mut entries = Vec::new();
        for (position, suggestion) in suggestions
            .into_iter()
            .take(self.settings.max_suggestions)
            .enumerate()
        {
            self.pacer.wait_turn().await;
            let results = self.results.fetch(&suggestion).await?;

            entries.push(SuggestionEntry {
                suggestion,
                rank: position + 1,
                clusters: cluster_results(results),
            });
        }

        Ok(entries)
    }

    /// Serializes the accumulated output as CSV
    ///
    /// Only available once the job is Complete.
    pub async fn export(&self) -> Result<Vec<u8>, ExplorerError> {
        let state = self.state.lock().await;
        if state.status() != JobStatus::Complete {
            return Err(JobError::JobNotComplete.into());
        }

        let bytes = write_csv(state.processed(), Vec::new())?;
        Ok(bytes)
    }

    /// Summarizes whatever output has accumulated so far
    pub async fn summary(&self) -> JobSummary {
        let state = self.state.lock().await;
        summarize(state.processed())
    }

    /// Writes a markdown report of the output accumulated so far
    pub async fn write_report(&self, title: &str, path: &Path) -> Result<(), ExplorerError> {
        let state = self.state.lock().await;
        let summary = summarize(state.processed());
        write_markdown_report(title, &summary, state.processed(), path)?;
        Ok(())
    }
}
