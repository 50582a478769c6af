//! Visit state definitions for tracking sweep progress
//!
//! Every candidate URL starts out `Pending` and ends in exactly one of the
//! terminal states below.

use crate::renderer::Outcome;
use std::fmt;

/// Represents the state of one candidate URL during a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// Not yet looked at in this run
    Pending,

    /// Already recorded in a checkpoint file by a previous run
    Skipped,

    /// The page rendered and was appended to the completed store
    Success,

    /// The page showed an error, timed out, or automation failed
    Errored,
}

impl VisitState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the URL was rendered during this run
    pub fn was_visited(&self) -> bool {
        matches!(self, Self::Success | Self::Errored)
    }

    /// Only `Pending` may move, and only into a terminal state
    pub fn can_transition_to(&self, next: VisitState) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }

    /// Terminal state reached from a renderer outcome
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::Success,
            Outcome::Error(_) => Self::Errored,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Success => "success",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
