//! State tracking for a sweep
//!
//! Each candidate URL moves through a small state machine:
//! Pending, then exactly one of Skipped, Success or Errored.

mod visit_state;

pub use visit_state::VisitState;
