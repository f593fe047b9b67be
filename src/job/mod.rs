//! The pausable enumeration job
//!
//! # Components
//!
//! - `JobState`: the job value and its synchronous transitions
//! - `Pacer`: the minimum-interval gate applied to every outbound call
//! - `JobController`: the lock-guarded owner of the job and its collaborators

mod controller;
mod pacer;
mod state;

pub use controller::{JobController, JobSettings};
pub use pacer::Pacer;
pub use state::{
    ControlAck, JobSnapshot, JobState, JobStatus, ProcessedCandidate, StepReport, StepStatus,
    SuggestionEntry,
};
