//! Candidate enumeration
//!
//! A candidate is the base word followed by a one- or two-letter suffix drawn
//! from the configured alphabet. The enumerator never materializes the whole
//! candidate space: any position can be computed directly, which is what lets
//! a paused job resume from its cursor.

mod candidates;

pub use candidates::{Candidate, CandidateEnumerator, Candidates};
