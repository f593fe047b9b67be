//! Job state definitions and transitions
//!
//! [`JobState`] is a plain value: every transition here is synchronous and
//! all-or-nothing, and the controller applies them while holding the state
//! lock. Network work happens between [`JobState::begin_step`] and
//! [`JobState::commit_step`], outside the lock.

use crate::cluster::Cluster;
use crate::enumerate::{Candidate, CandidateEnumerator};
use crate::{JobError, JobResult};
use std::fmt;

/// Lifecycle status of the enumeration job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// No job has been started, or the last one was cancelled
    Idle,

    /// Steps are accepted
    Running,

    /// Steps are refused until the job is resumed
    Paused,

    /// Every candidate has been processed
    Complete,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Acknowledgement returned by the control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAck {
    Paused,
    Resumed,
    Cancelled,
}

/// One autocomplete suggestion with its clustered search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub suggestion: String,

    /// 1-based position in the autocomplete response (lower ranks first)
    pub rank: usize,

    pub clusters: Vec<Cluster>,
}

impl SuggestionEntry {
    /// Total number of search results across all clusters
    pub fn result_count(&self) -> usize {
        self.clusters.iter().map(|c| c.cluster_size).sum()
    }
}

/// A candidate together with everything its step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedCandidate {
    pub candidate: Candidate,
    pub entries: Vec<SuggestionEntry>,
}

/// Outcome reported by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// A candidate was processed and more remain
    Running,

    /// No candidates remain
    Complete,

    /// The job was not running, or the step was discarded by a Start/Cancel
    NotRunning,
}

/// Progress report returned by every successful step call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub status: StepStatus,

    /// The candidate processed by this step, if any
    pub candidate: Option<Candidate>,

    /// Number of candidates processed so far (the cursor)
    pub progress: usize,

    pub total: usize,

    /// Entries produced by this step; empty when no work was committed
    pub new_entries: Vec<SuggestionEntry>,
}

impl StepReport {
    fn idle(status: StepStatus, progress: usize, total: usize) -> Self {
        Self {
            status,
            candidate: None,
            progress,
            total,
            new_entries: Vec::new(),
        }
    }
}

/// Read-only view of the job for polling callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub cursor: usize,
    pub total: usize,
    pub base_word: Option<String>,
    pub suffix_length: Option<u8>,

    /// Failed steps since the last successful one
    pub consecutive_failures: u32,
}

/// What a step has to do, decided under the state lock
#[derive(Debug)]
pub(crate) enum StepStart {
    /// Nothing to fetch; report immediately
    Finished(StepReport),

    /// Fetch this candidate, then commit against `epoch`
    Work { epoch: u64, candidate: Candidate },
}

/// The single enumeration job
///
/// Invariants:
/// - `cursor <= total`, and `cursor == total` exactly when the status is Complete
/// - `processed.len() == cursor`
/// - `epoch` changes on every Start and Cancel, invalidating in-flight steps
#[derive(Debug, Clone)]
pub struct JobState {
    status: JobStatus,
    enumerator: Option<CandidateEnumerator>,
    cursor: usize,
    processed: Vec<ProcessedCandidate>,
    epoch: u64,
    consecutive_failures: u32,
}

impl Default for JobState {
    fn default() -> Self {
        Self::new()
    }
}

impl JobState {
    pub fn new() -> Self {
        Self {
            status: JobStatus::Idle,
            enumerator: None,
            cursor: 0,
            processed: Vec::new(),
            epoch: 0,
            consecutive_failures: 0,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.enumerator.as_ref().map_or(0, CandidateEnumerator::len)
    }

    /// Accumulated output in processing order
    pub fn processed(&self) -> &[ProcessedCandidate] {
        &self.processed
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            cursor: self.cursor,
            total: self.total(),
            base_word: self.enumerator.as_ref().map(|e| e.base_word().to_string()),
            suffix_length: self.enumerator.as_ref().map(CandidateEnumerator::suffix_length),
            consecutive_failures: self.consecutive_failures,
        }
    }

    /// Replaces whatever job existed with a fresh running one
    pub fn start(&mut self, enumerator: CandidateEnumerator) {
        self.epoch += 1;
        self.enumerator = Some(enumerator);
        self.cursor = 0;
        self.processed.clear();
        self.consecutive_failures = 0;
        self.status = JobStatus::Running;
    }

    pub fn pause(&mut self) -> JobResult<ControlAck> {
        if self.status != JobStatus::Running {
            return Err(JobError::NotRunning);
        }
        self.status = JobStatus::Paused;
        Ok(ControlAck::Paused)
    }

    pub fn resume(&mut self) -> JobResult<ControlAck> {
        if self.status != JobStatus::Paused {
            return Err(JobError::NotPaused);
        }
        self.status = JobStatus::Running;
        Ok(ControlAck::Resumed)
    }

    /// Discards the job; a no-op when already idle
    pub fn cancel(&mut self) -> ControlAck {
        if self.status != JobStatus::Idle {
            self.epoch += 1;
            self.enumerator = None;
            self.cursor = 0;
            self.processed.clear();
            self.consecutive_failures = 0;
            self.status = JobStatus::Idle;
        }
        ControlAck::Cancelled
    }

    /// Decides what the next step should do without doing any I/O
    pub(crate) fn begin_step(&mut self) -> StepStart {
        let total = self.total();

        match self.status {
            JobStatus::Complete => {
                return StepStart::Finished(StepReport::idle(
                    StepStatus::Complete,
                    self.cursor,
                    total,
                ))
            }
            JobStatus::Idle | JobStatus::Paused => {
                return StepStart::Finished(StepReport::idle(
                    StepStatus::NotRunning,
                    self.cursor,
                    total,
                ))
            }
            JobStatus::Running => {}
        }

        let candidate = self
            .enumerator
            .as_ref()
            .and_then(|enumerator| enumerator.get(self.cursor));

        match candidate {
            Some(candidate) => StepStart::Work {
                epoch: self.epoch,
                candidate,
            },
            None => {
                self.status = JobStatus::Complete;
                StepStart::Finished(StepReport::idle(StepStatus::Complete, self.cursor, total))
            }
        }
    }

    /// Applies the result of a step started by [`begin_step`](Self::begin_step)
    ///
    /// The result is discarded (reported as NotRunning) when a Start or Cancel
    /// happened while the step was in flight. A Pause does not discard it.
    pub(crate) fn commit_step(
        &mut self,
        epoch: u64,
        candidate: Candidate,
        entries: Vec<SuggestionEntry>,
    ) -> StepReport {
        let total = self.total();
        let live = matches!(self.status, JobStatus::Running | JobStatus::Paused);

        if epoch != self.epoch || !live || candidate.index != self.cursor {
            tracing::debug!(
                "Discarding result for '{}': job changed while the step was in flight",
                candidate
            );
            return StepReport::idle(StepStatus::NotRunning, self.cursor, total);
        }

        self.processed.push(ProcessedCandidate {
            candidate: candidate.clone(),
            entries: entries.clone(),
        });
        self.cursor += 1;
        self.consecutive_failures = 0;

        let status = if self.cursor == total {
            self.status = JobStatus::Complete;
            StepStatus::Complete
        } else {
            StepStatus::Running
        };

        StepReport {
            status,
            candidate: Some(candidate),
            progress: self.cursor,
            total,
            new_entries: entries,
        }
    }

    /// Counts a failed step; the cursor is left where it was
    pub(crate) fn record_failure(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.consecutive_failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerator(letters: &str) -> CandidateEnumerator {
        let alphabet: Vec<String> = letters.chars().map(String::from).collect();
        CandidateEnumerator::new("a", 1, &alphabet, "").unwrap()
    }

    fn work(state: &mut JobState) -> (u64, Candidate) {
        match state.begin_step() {
            StepStart::Work { epoch, candidate } => (epoch, candidate),
            StepStart::Finished(report) => panic!("expected work, got {:?}", report),
        }
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = JobState::new();
        assert_eq!(state.status(), JobStatus::Idle);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.total(), 0);
        assert!(state.processed().is_empty());
    }

    #[test]
    fn test_full_run_reaches_complete() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));

        let (epoch, candidate) = work(&mut state);
        assert_eq!(candidate.text, "ax");
        let report = state.commit_step(epoch, candidate, vec![]);
        assert_eq!(report.status, StepStatus::Running);
        assert_eq!((report.progress, report.total), (1, 2));

        let (epoch, candidate) = work(&mut state);
        let report = state.commit_step(epoch, candidate, vec![]);
        assert_eq!(report.status, StepStatus::Complete);
        assert_eq!((report.progress, report.total), (2, 2));
        assert_eq!(state.status(), JobStatus::Complete);
        assert_eq!(state.processed().len(), 2);
    }

    #[test]
    fn test_step_when_complete_is_terminal_and_idempotent() {
        let mut state = JobState::new();
        state.start(enumerator("x"));
        let (epoch, candidate) = work(&mut state);
        state.commit_step(epoch, candidate, vec![]);

        for _ in 0..2 {
            match state.begin_step() {
                StepStart::Finished(report) => {
                    assert_eq!(report.status, StepStatus::Complete);
                    assert_eq!(report.progress, 1);
                }
                StepStart::Work { .. } => panic!("complete job must not do work"),
            }
        }
    }

    #[test]
    fn test_step_when_paused_reports_not_running() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));
        state.pause().unwrap();

        match state.begin_step() {
            StepStart::Finished(report) => assert_eq!(report.status, StepStatus::NotRunning),
            StepStart::Work { .. } => panic!("paused job must not do work"),
        }
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.status(), JobStatus::Paused);
    }

    #[test]
    fn test_pause_resume_preconditions() {
        let mut state = JobState::new();
        assert_eq!(state.pause(), Err(JobError::NotRunning));
        assert_eq!(state.resume(), Err(JobError::NotPaused));

        state.start(enumerator("xy"));
        assert_eq!(state.resume(), Err(JobError::NotPaused));
        assert_eq!(state.pause(), Ok(ControlAck::Paused));
        assert_eq!(state.pause(), Err(JobError::NotRunning));
        assert_eq!(state.resume(), Ok(ControlAck::Resumed));
        assert_eq!(state.status(), JobStatus::Running);
    }

    #[test]
    fn test_cancel_discards_in_flight_step() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));
        let (epoch, candidate) = work(&mut state);

        assert_eq!(state.cancel(), ControlAck::Cancelled);
        let report = state.commit_step(epoch, candidate, vec![]);

        assert_eq!(report.status, StepStatus::NotRunning);
        assert_eq!(state.cursor(), 0);
        assert!(state.processed().is_empty());
        assert_eq!(state.status(), JobStatus::Idle);
    }

    #[test]
    fn test_restart_discards_in_flight_step() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));
        let (epoch, candidate) = work(&mut state);

        state.start(enumerator("xyz"));
        let report = state.commit_step(epoch, candidate, vec![]);

        assert_eq!(report.status, StepStatus::NotRunning);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.total(), 3);
    }

    #[test]
    fn test_pause_keeps_in_flight_step() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));
        let (epoch, candidate) = work(&mut state);

        state.pause().unwrap();
        let report = state.commit_step(epoch, candidate, vec![]);

        assert_eq!(report.progress, 1);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.status(), JobStatus::Paused);
    }

    #[test]
    fn test_failures_are_counted_until_success() {
        let mut state = JobState::new();
        state.start(enumerator("xy"));
        let (epoch, candidate) = work(&mut state);

        state.record_failure(epoch);
        state.record_failure(epoch);
        assert_eq!(state.snapshot().consecutive_failures, 2);
        assert_eq!(state.cursor(), 0);

        state.commit_step(epoch, candidate, vec![]);
        assert_eq!(state.snapshot().consecutive_failures, 0);
    }

    #[test]
    fn test_cancel_from_idle_is_noop() {
        let mut state = JobState::new();
        assert_eq!(state.cancel(), ControlAck::Cancelled);
        assert_eq!(state.status(), JobStatus::Idle);
    }

    #[test]
    fn test_snapshot_describes_job() {
        let mut state = JobState::new();
        state.start(enumerator("xyz"));
        let snapshot = state.snapshot();

        assert_eq!(snapshot.status, JobStatus::Running);
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.base_word.as_deref(), Some("a"));
        assert_eq!(snapshot.suffix_length, Some(1));
    }
}
