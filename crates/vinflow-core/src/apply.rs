//! Functional-boundary apply functions
//!
//! These are the in-memory commit points for planned write sets. Each one
//! re-checks its compare-and-set preconditions against the state it is given
//! before mutating anything, so a plan made against a stale snapshot cannot
//! corrupt the order.
//!
//! ## Atomicity Contract
//!
//! - **Step writes**: every stamp whose row still lacks the step and still
//!   holds the previous one is written; stamps that fail the re-check are
//!   excluded. If every stamp fails, nothing is written and `Conflict` is
//!   returned.
//! - **Finish**: written only if the order is still open and every row has
//!   arrived. Otherwise nothing changes.
//! - **No panics**: a stamp naming an unknown VIN is an excluded stamp, not an
//!   index error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WorkflowError};
use crate::model::{Order, OrderRow, OrderStatus};
use crate::ops::{FinishWriteSet, StepWriteSet};
use crate::steps::{check_transition, Transition};

/// Result of committing a [`StepWriteSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOutcome {
    /// VINs that received the step
    pub applied: Vec<String>,
    /// VINs dropped because a concurrent writer got there first
    pub excluded: Vec<String>,
}

impl AppliedOutcome {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.excluded.is_empty()
    }
}

/// Commit a step write set against `order` and its `rows`
///
/// # Errors
/// * `Conflict` - none of the stamps still satisfied its precondition
/// * `Internal` - the write set belongs to a different order
pub fn apply_step_writes(
    order: &mut Order,
    rows: &mut [OrderRow],
    writes: &StepWriteSet,
) -> Result<AppliedOutcome> {
    if order.id != writes.order_id {
        return Err(WorkflowError::Internal {
            message: format!(
                "write set for order {} applied to order {}",
                writes.order_id, order.id
            ),
        });
    }

    let index: BTreeMap<&str, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.vin.as_str(), i))
        .collect();

    let mut passing = Vec::with_capacity(writes.stamps.len());
    let mut outcome = AppliedOutcome::default();

    for stamp in &writes.stamps {
        match index.get(stamp.vin.as_str()) {
            Some(&i) if check_transition(&rows[i].steps, writes.step) == Transition::Valid => {
                passing.push((i, stamp));
            }
            _ => outcome.excluded.push(stamp.vin.clone()),
        }
    }

    if passing.is_empty() {
        return Err(WorkflowError::Conflict {
            order_id: order.id.to_string(),
            message: format!(
                "step {} was already applied or became invalid for every target",
                writes.step.number()
            ),
        });
    }

    for (i, stamp) in passing {
        let row = &mut rows[i];
        *row.steps.slot_mut(writes.step) = Some(stamp.record.clone());
        if let Some(location) = &stamp.new_location {
            row.location = location.clone();
        }
        row.updated_at = writes.at;
        outcome.applied.push(stamp.vin.clone());
    }

    order.updated_at = writes.at;
    Ok(outcome)
}

/// Commit a finish write set against `order`
///
/// # Errors
/// * `Conflict` - the order was closed meanwhile or a row has not arrived
pub fn apply_finish(order: &mut Order, rows: &[OrderRow], writes: &FinishWriteSet) -> Result<()> {
    if order.id != writes.order_id {
        return Err(WorkflowError::Internal {
            message: format!(
                "finish for order {} applied to order {}",
                writes.order_id, order.id
            ),
        });
    }

    if order.status != OrderStatus::Open {
        return Err(WorkflowError::Conflict {
            order_id: order.id.to_string(),
            message: "order is no longer open".to_string(),
        });
    }

    if rows.iter().any(|r| !r.has_arrived()) {
        return Err(WorkflowError::Conflict {
            order_id: order.id.to_string(),
            message: "a row has not arrived".to_string(),
        });
    }

    order.status = OrderStatus::Completed;
    order.finished_at = Some(writes.finished_at);
    order.finished_by = Some(writes.finished_by.clone());
    order.updated_at = writes.finished_at;
    Ok(())
}
