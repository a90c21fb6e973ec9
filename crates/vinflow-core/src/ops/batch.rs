//! Batch step application
//!
//! One actor gesture ("mark step N done") targets every row of the order the
//! actor may currently advance. The batch is validated as a whole: if any
//! targeted row is not ready for the step, nothing is written.

use chrono::{DateTime, Utc};
use vinflow_core_types::OrderId;

use crate::apply::apply_step_writes;
use crate::authz::can_perform;
use crate::errors::{Result, WorkflowError};
use crate::model::{Actor, Order, OrderRow, StepRecord};
use crate::steps::{check_transition, Step, Transition};

/// Write for one targeted row
#[derive(Debug, Clone, PartialEq)]
pub struct RowStamp {
    pub vin: String,
    pub record: StepRecord,
    /// New current location; set only for step 3
    pub new_location: Option<String>,
}

/// Mutation set emitted by [`plan_step`]
///
/// A store committing it must re-check, per row, that the step is still
/// absent and its predecessor present, and must touch the order's
/// `updated_at` in the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StepWriteSet {
    pub order_id: OrderId,
    pub step: Step,
    pub stamps: Vec<RowStamp>,
    pub at: DateTime<Utc>,
}

impl StepWriteSet {
    pub fn vins(&self) -> Vec<String> {
        self.stamps.iter().map(|s| s.vin.clone()).collect()
    }
}

/// Plan applying `step` to every row of `order` the actor may advance
///
/// # Errors
/// * `NoEligibleTargets` - the actor may not advance any row that still lacks the step
/// * `PrecedenceViolation` - some targeted row lacks the previous step; carries those VINs
/// * `CorruptRecord` - a step-3 target has no destination
pub fn plan_step(
    step: Step,
    actor: &Actor,
    order: &Order,
    rows: &[OrderRow],
    at: DateTime<Utc>,
) -> Result<StepWriteSet> {
    let targets: Vec<&OrderRow> = rows
        .iter()
        .filter(|r| !r.steps.has(step) && can_perform(actor, r, step, order))
        .collect();

    if targets.is_empty() {
        return Err(WorkflowError::NoEligibleTargets {
            order_id: order.id.to_string(),
            step: step.number(),
        });
    }

    let out_of_order: Vec<String> = targets
        .iter()
        .filter(|r| check_transition(&r.steps, step) == Transition::PrecedenceViolation)
        .map(|r| r.vin.clone())
        .collect();

    if !out_of_order.is_empty() {
        return Err(WorkflowError::PrecedenceViolation {
            order_id: order.id.to_string(),
            step: step.number(),
            vins: out_of_order,
        });
    }

    let record = StepRecord {
        at,
        by_uid: actor.identity.uid.clone(),
        by_email: actor.identity.email.clone(),
        by_name: actor.display_name(),
    };

    let stamps = targets
        .into_iter()
        .map(|row| {
            let new_location = match step {
                Step::CarReceived => Some(
                    row.destination()
                        .ok_or_else(|| WorkflowError::CorruptRecord {
                            order_id: order.id.to_string(),
                            reason: format!("row {} has no destination", row.vin),
                        })?
                        .to_string(),
                ),
                _ => None,
            };
            Ok(RowStamp {
                vin: row.vin.clone(),
                record: record.clone(),
                new_location,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StepWriteSet {
        order_id: order.id.clone(),
        step,
        stamps,
        at,
    })
}

/// Plan and apply `step` against an in-memory snapshot
///
/// Returns the updated versions of the rows that were stamped. `order` and
/// `rows` are left untouched.
///
/// # Errors
/// Same as [`plan_step`].
pub fn apply_step(
    step: Step,
    actor: &Actor,
    order: &Order,
    rows: &[OrderRow],
    at: DateTime<Utc>,
) -> Result<Vec<OrderRow>> {
    let write_set = plan_step(step, actor, order, rows, at)?;
    let mut next_order = order.clone();
    let mut next_rows = rows.to_vec();
    let outcome = apply_step_writes(&mut next_order, &mut next_rows, &write_set)?;
    Ok(next_rows
        .into_iter()
        .filter(|r| outcome.applied.contains(&r.vin))
        .collect())
}
