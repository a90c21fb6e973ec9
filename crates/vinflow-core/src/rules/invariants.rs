//! Workflow invariants over a stored order snapshot
//!
//! The write paths never break these. They are checked when a snapshot is
//! loaded from storage so that a tampered or half-migrated record surfaces as
//! `CorruptRecord` instead of feeding wrong facts into authorization.

use crate::errors::{Result, WorkflowError};
use crate::model::{Order, OrderKind, OrderRow};
use crate::steps::is_ordered;

/// Check one row
///
/// # Errors
/// `CorruptRecord` when checkpoints are out of order or the location does not
/// match the arrival state.
pub fn check_row(order_id: &str, row: &OrderRow) -> Result<()> {
    let corrupt = |reason: String| WorkflowError::CorruptRecord {
        order_id: order_id.to_string(),
        reason,
    };

    if !is_ordered(&row.steps) {
        return Err(corrupt(format!("row {} has out-of-order steps", row.vin)));
    }

    let destination = row
        .destination()
        .ok_or_else(|| corrupt(format!("row {} has no destination", row.vin)))?;

    if row.has_arrived() {
        if row.location != destination {
            return Err(corrupt(format!(
                "row {} arrived but is located at {} instead of {}",
                row.vin, row.location, destination
            )));
        }
    } else if row.location != row.from_location {
        return Err(corrupt(format!(
            "row {} moved to {} before arriving",
            row.vin, row.location
        )));
    }

    Ok(())
}

/// Check an order together with all of its rows
///
/// # Errors
/// `CorruptRecord` on any violated invariant.
pub fn check_order(order: &Order, rows: &[OrderRow]) -> Result<()> {
    let order_id = order.id.as_str();
    let corrupt = |reason: String| WorkflowError::CorruptRecord {
        order_id: order_id.to_string(),
        reason,
    };

    for row in rows {
        check_row(order_id, row)?;
    }

    if order.total as usize != rows.len() {
        return Err(corrupt(format!(
            "total is {} but {} rows are stored",
            order.total,
            rows.len()
        )));
    }

    let derived: Option<OrderKind> = OrderKind::derive(rows.iter().map(|r| r.kind));
    if !rows.is_empty() && derived != Some(order.kind) {
        return Err(corrupt(format!(
            "kind is {} but rows derive {:?}",
            order.kind.as_str(),
            derived
        )));
    }

    if order.is_completed() {
        if let Some(row) = rows.iter().find(|r| !r.has_arrived()) {
            return Err(corrupt(format!(
                "completed order has row {} that has not arrived",
                row.vin
            )));
        }
        if order.finished_at.is_none() || order.finished_by.is_none() {
            return Err(corrupt("completed order lacks closer details".to_string()));
        }
    }

    Ok(())
}
