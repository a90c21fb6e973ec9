//! Order completion guard

use chrono::{DateTime, Utc};
use vinflow_core_types::OrderId;

use crate::apply::apply_finish;
use crate::authz::can_finish;
use crate::errors::{Result, WorkflowError};
use crate::model::{Actor, Identity, Order, OrderRow};

/// Mutation set emitted by [`plan_finish`]; committed as one conditional write
#[derive(Debug, Clone, PartialEq)]
pub struct FinishWriteSet {
    pub order_id: OrderId,
    pub finished_at: DateTime<Utc>,
    pub finished_by: Identity,
}

/// Decide whether `actor` may close `order` now
///
/// The row check runs before the identity check, so an order with a row that
/// has not arrived reports `IncompleteRows` whoever asks.
///
/// # Errors
/// * `AlreadyCompleted` - the order is already closed
/// * `IncompleteRows` - some rows lack step 3; carries their VINs
/// * `IdentityMismatch` - actor is neither admin nor the creator
pub fn plan_finish(
    actor: &Actor,
    order: &Order,
    rows: &[OrderRow],
    at: DateTime<Utc>,
) -> Result<FinishWriteSet> {
    if order.is_completed() {
        return Err(WorkflowError::AlreadyCompleted {
            order_id: order.id.to_string(),
        });
    }

    let pending: Vec<String> = rows
        .iter()
        .filter(|r| !r.has_arrived())
        .map(|r| r.vin.clone())
        .collect();
    if !pending.is_empty() {
        return Err(WorkflowError::IncompleteRows {
            order_id: order.id.to_string(),
            pending,
        });
    }

    if !can_finish(actor, order) {
        return Err(WorkflowError::IdentityMismatch {
            order_id: order.id.to_string(),
        });
    }

    Ok(FinishWriteSet {
        order_id: order.id.clone(),
        finished_at: at,
        finished_by: Identity {
            uid: actor.identity.uid.clone(),
            email: actor.identity.email.clone(),
            name: actor.display_name(),
        },
    })
}

/// Plan and apply completion against an in-memory snapshot
///
/// # Errors
/// Same as [`plan_finish`].
pub fn finish(
    actor: &Actor,
    order: &Order,
    rows: &[OrderRow],
    at: DateTime<Utc>,
) -> Result<Order> {
    let write_set = plan_finish(actor, order, rows, at)?;
    let mut updated = order.clone();
    apply_finish(&mut updated, rows, &write_set)?;
    Ok(updated)
}
