//! Order command handlers with boundary logging
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for order operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use vinflow_core::apply::AppliedOutcome;
use vinflow_core::errors::ExError;
use vinflow_core::model::Order;
use vinflow_core::ops::{plan_finish, plan_order, plan_step, RowInput};
use vinflow_core::steps::Step;
use vinflow_core::{log_op_end, log_op_error, log_op_start};
use vinflow_core_types::{OrderId, RequestId, Sensitive};

use crate::context::Collaborators;
use crate::Result;

/// Attach the request id, and the op name when the lower layer left none
pub(crate) fn tag(err: ExError, op: &str, request_id: &RequestId) -> ExError {
    let err = if err.op().is_none() {
        err.with_op(op)
    } else {
        err
    };
    err.with_request_id(request_id.clone())
}

/// Create an open order from submitted rows
///
/// Origins and vehicle attributes are pre-filled from the inventory. The
/// order and all of its rows are written as one unit.
///
/// ## Errors
///
/// - `Unauthorised`: nobody is signed in
/// - `InvalidInput`: empty input, a row without VIN or destination, a VIN
///   listed twice, or a row whose origin is unknown
/// - `Forbidden`: the actor may not create one of the row kinds
/// - `Persistence`: storage failure
pub fn create_order(ctx: &Collaborators<'_>, rows: &[RowInput]) -> Result<OrderId> {
    let request_id = RequestId::new();
    log_op_start!(
        "create_order",
        row_count = rows.len(),
        request_id = request_id.as_str()
    );
    let start = std::time::Instant::now();

    let order_id = create_order_impl(ctx, rows)
        .map_err(|e| tag(e, "create_order", &request_id))
        .map_err(|e| {
            log_op_error!(
                "create_order",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = request_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "create_order",
        duration_ms = start.elapsed().as_millis() as u64,
        order_id = order_id.as_str(),
        row_count = rows.len(),
        request_id = request_id.as_str()
    );

    Ok(order_id)
}

fn create_order_impl(ctx: &Collaborators<'_>, rows: &[RowInput]) -> Result<OrderId> {
    let actor = ctx.actor()?;
    let inventory = ctx.prefetch_inventory(rows)?;
    let new_order = plan_order(&actor, rows, &inventory, ctx.config, ctx.clock.now())?;

    tracing::debug!(
        order_id = new_order.order.id.as_str(),
        kind = new_order.order.kind.as_str(),
        actor_uid = actor.identity.uid.as_str(),
        actor_email = %Sensitive::new(actor.identity.email.as_str()),
        "planned new order"
    );

    ctx.store.commit_new_order(&new_order)?;
    Ok(new_order.order.id)
}

/// Apply `step` to every row of the order the actor may advance
///
/// Rows that lost a race to another writer between load and commit are
/// reported in `excluded`; the others are stamped in one transaction.
///
/// ## Errors
///
/// - `InvalidStep`: `step` is not 1, 2 or 3
/// - `NotFound`: unknown order
/// - `NoEligibleTargets`: the actor may not advance any row still lacking the step
/// - `PrecedenceViolation`: a targeted row lacks the previous step; nothing is written
/// - `Concurrency`: every target was stamped by someone else first
/// - `Persistence`: storage failure
pub fn apply_step(ctx: &Collaborators<'_>, order_id: &OrderId, step: u8) -> Result<AppliedOutcome> {
    let request_id = RequestId::new();
    log_op_start!(
        "apply_step",
        order_id = order_id.as_str(),
        step = step,
        request_id = request_id.as_str()
    );
    let start = std::time::Instant::now();

    let outcome = apply_step_impl(ctx, order_id, step)
        .map_err(|e| tag(e, "apply_step", &request_id))
        .map_err(|e| {
            log_op_error!(
                "apply_step",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                order_id = order_id.as_str(),
                step = step,
                request_id = request_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "apply_step",
        duration_ms = start.elapsed().as_millis() as u64,
        order_id = order_id.as_str(),
        step = step,
        applied = outcome.applied_count(),
        excluded = outcome.excluded.len(),
        request_id = request_id.as_str()
    );

    Ok(outcome)
}

fn apply_step_impl(ctx: &Collaborators<'_>, order_id: &OrderId, step: u8) -> Result<AppliedOutcome> {
    let step = Step::from_number(step)?;
    let actor = ctx.actor()?;
    let snapshot = ctx.snapshot(order_id)?;

    let writes = plan_step(step, &actor, &snapshot.order, &snapshot.rows, ctx.clock.now())?;
    tracing::debug!(
        order_id = order_id.as_str(),
        step = step.key(),
        targets = writes.stamps.len(),
        "planned step"
    );

    let outcome = ctx.store.commit_steps(&writes)?;
    if outcome.is_partial() {
        tracing::debug!(
            order_id = order_id.as_str(),
            excluded = ?outcome.excluded,
            "rows changed between load and commit"
        );
    }
    Ok(outcome)
}

/// Close an order once every row has arrived
///
/// ## Errors
///
/// - `NotFound`: unknown order
/// - `AlreadyCompleted`: the order is already closed
/// - `IncompleteRows`: some rows have not arrived
/// - `IdentityMismatch`: the actor is neither admin nor the creator
/// - `Concurrency`: the order was finished by someone else first
/// - `Persistence`: storage failure
pub fn finish_order(ctx: &Collaborators<'_>, order_id: &OrderId) -> Result<Order> {
    let request_id = RequestId::new();
    log_op_start!(
        "finish_order",
        order_id = order_id.as_str(),
        request_id = request_id.as_str()
    );
    let start = std::time::Instant::now();

    let order = finish_order_impl(ctx, order_id)
        .map_err(|e| tag(e, "finish_order", &request_id))
        .map_err(|e| {
            log_op_error!(
                "finish_order",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                order_id = order_id.as_str(),
                request_id = request_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "finish_order",
        duration_ms = start.elapsed().as_millis() as u64,
        order_id = order_id.as_str(),
        request_id = request_id.as_str()
    );

    Ok(order)
}

fn finish_order_impl(ctx: &Collaborators<'_>, order_id: &OrderId) -> Result<Order> {
    let actor = ctx.actor()?;
    let snapshot = ctx.snapshot(order_id)?;
    let writes = plan_finish(&actor, &snapshot.order, &snapshot.rows, ctx.clock.now())?;
    Ok(ctx.store.commit_finish(&writes)?)
}
