//! Per-row step state machine
//!
//! A row moves strictly `Pending -> Received -> Sent -> Arrived`. The only
//! valid transition for a row is its next eligible step.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WorkflowError};
use crate::model::{OrderRow, RowSteps};

/// One of the three ordered custody-transfer checkpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    /// 1: the origin branch has taken the request
    Received,
    /// 2: the vehicle has left the origin
    Sent,
    /// 3: the vehicle has arrived at its destination
    CarReceived,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Received, Step::Sent, Step::CarReceived];

    /// Parse a user-facing step number
    ///
    /// # Errors
    /// `InvalidStep` for anything outside 1..=3.
    pub fn from_number(n: u8) -> Result<Step> {
        match n {
            1 => Ok(Step::Received),
            2 => Ok(Step::Sent),
            3 => Ok(Step::CarReceived),
            step => Err(WorkflowError::InvalidStep { step }),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Step::Received => 1,
            Step::Sent => 2,
            Step::CarReceived => 3,
        }
    }

    /// Persisted key of the step entry
    pub fn key(&self) -> &'static str {
        match self {
            Step::Received => "received",
            Step::Sent => "sent",
            Step::CarReceived => "carReceived",
        }
    }

    /// The step that must already be present before this one
    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Received => None,
            Step::Sent => Some(Step::Received),
            Step::CarReceived => Some(Step::Sent),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.key())
    }
}

/// Where a row is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Pending,
    Received,
    Sent,
    Arrived,
}

impl RowState {
    /// Status label key shown next to each row
    pub fn label(&self) -> &'static str {
        match self {
            RowState::Pending => "awaiting_receipt",
            RowState::Received => "received_awaiting_dispatch",
            RowState::Sent => "sent_awaiting_arrival",
            RowState::Arrived => "arrived",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == RowState::Arrived
    }
}

/// Outcome of checking one step against one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The step is exactly the next eligible one
    Valid,
    /// The row already holds the step
    AlreadyApplied,
    /// The preceding step is missing
    PrecedenceViolation,
}

/// Next eligible step for a row, `None` when the row is terminal
pub fn next_step(steps: &RowSteps) -> Option<Step> {
    Step::ALL.into_iter().find(|s| !steps.has(*s))
}

pub fn state_of(row: &OrderRow) -> RowState {
    match next_step(&row.steps) {
        Some(Step::Received) => RowState::Pending,
        Some(Step::Sent) => RowState::Received,
        Some(Step::CarReceived) => RowState::Sent,
        None => RowState::Arrived,
    }
}

/// Classify applying `step` to a row with the given step entries
pub fn check_transition(steps: &RowSteps, step: Step) -> Transition {
    if steps.has(step) {
        return Transition::AlreadyApplied;
    }
    match step.previous() {
        Some(prev) if !steps.has(prev) => Transition::PrecedenceViolation,
        _ => Transition::Valid,
    }
}

/// No checkpoint is present without all of its predecessors
pub fn is_ordered(steps: &RowSteps) -> bool {
    Step::ALL
        .into_iter()
        .filter(|s| steps.has(*s))
        .all(|s| s.previous().map_or(true, |p| steps.has(p)))
}
