//! Read-only order views
//!
//! Queries load a snapshot per call and never write. Listings return headers
//! only; `order_detail` carries the rows and the per-actor annotations a
//! front-end needs to decide which action to offer.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use vinflow_core::model::{Order, OrderKind, OrderRow, OrderStatus};
use vinflow_core::ops::{actionable_rows, progress, step_summary, StepSummary};
use vinflow_core::steps::{next_step, state_of};
use vinflow_core::{log_op_end, log_op_error, log_op_start};
use vinflow_core_types::{OrderId, RequestId};

use crate::commands::orders::tag;
use crate::context::Collaborators;
use crate::Result;

/// Listing entry for one order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub created_by_name: String,
    pub total: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            kind: order.kind,
            status: order.status,
            created_by_name: order.created_by.name.clone(),
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
            finished_at: order.finished_at,
        }
    }
}

/// One row with its derived state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    #[serde(flatten)]
    pub row: OrderRow,
    pub state: &'static str,
    /// Number of the step this row waits for, `None` once arrived
    pub next_step: Option<u8>,
    /// The acting user may perform `next_step` on this row
    pub actionable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    /// Sorted by VIN
    pub rows: Vec<RowView>,
    pub progress: u8,
    pub summary: StepSummary,
    pub actionable_vins: Vec<String>,
}

/// Completion percentage of an order
///
/// ## Errors
///
/// - `NotFound`: unknown order
/// - `CorruptRecord`: the stored order breaks a workflow invariant
/// - `Persistence`: storage failure
pub fn get_progress(ctx: &Collaborators<'_>, order_id: &OrderId) -> Result<u8> {
    let request_id = RequestId::new();
    log_op_start!("get_progress", order_id = order_id.as_str());
    let start = std::time::Instant::now();

    let percent = ctx
        .snapshot(order_id)
        .map(|s| progress(&s.order, &s.rows))
        .map_err(|e| tag(e, "get_progress", &request_id))
        .map_err(|e| {
            log_op_error!(
                "get_progress",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                order_id = order_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "get_progress",
        duration_ms = start.elapsed().as_millis() as u64,
        order_id = order_id.as_str(),
        progress = percent
    );
    Ok(percent)
}

/// Full view of an order as seen by the signed-in actor
///
/// ## Errors
///
/// - `Unauthorised`: nobody is signed in
/// - `NotFound`: unknown order
/// - `CorruptRecord`: the stored order breaks a workflow invariant
/// - `Persistence`: storage failure
pub fn order_detail(ctx: &Collaborators<'_>, order_id: &OrderId) -> Result<OrderDetail> {
    let request_id = RequestId::new();
    log_op_start!("order_detail", order_id = order_id.as_str());
    let start = std::time::Instant::now();

    let detail = order_detail_impl(ctx, order_id)
        .map_err(|e| tag(e, "order_detail", &request_id))
        .map_err(|e| {
            log_op_error!(
                "order_detail",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                order_id = order_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "order_detail",
        duration_ms = start.elapsed().as_millis() as u64,
        order_id = order_id.as_str(),
        row_count = detail.rows.len()
    );
    Ok(detail)
}

fn order_detail_impl(ctx: &Collaborators<'_>, order_id: &OrderId) -> Result<OrderDetail> {
    let actor = ctx.actor()?;
    let snapshot = ctx.snapshot(order_id)?;
    let (order, rows) = (snapshot.order, snapshot.rows);

    let actionable_vins: Vec<String> = actionable_rows(&actor, &order, &rows)
        .into_iter()
        .map(|r| r.vin.clone())
        .collect();
    let percent = progress(&order, &rows);
    let summary = step_summary(&order, &rows);

    let rows = rows
        .into_iter()
        .map(|row| RowView {
            state: state_of(&row).label(),
            next_step: next_step(&row.steps).map(|s| s.number()),
            actionable: actionable_vins.contains(&row.vin),
            row,
        })
        .collect();

    Ok(OrderDetail {
        order,
        rows,
        progress: percent,
        summary,
        actionable_vins,
    })
}

/// Open orders, most recently updated first
///
/// ## Errors
///
/// - `Persistence`: storage failure
pub fn list_open_orders(ctx: &Collaborators<'_>) -> Result<Vec<OrderSummary>> {
    list_orders(ctx, "list_open_orders", OrderStatus::Open)
}

/// Completed orders, most recently finished first, capped at
/// `completed_list_limit`
///
/// ## Errors
///
/// - `Persistence`: storage failure
pub fn list_completed_orders(ctx: &Collaborators<'_>) -> Result<Vec<OrderSummary>> {
    list_orders(ctx, "list_completed_orders", OrderStatus::Completed)
}

fn list_orders(
    ctx: &Collaborators<'_>,
    op: &'static str,
    status: OrderStatus,
) -> Result<Vec<OrderSummary>> {
    let request_id = RequestId::new();
    log_op_start!(op, status = status.as_str());
    let start = std::time::Instant::now();

    let summaries = ctx
        .store
        .list_orders(status)
        .map(|orders| sort_for_listing(orders, status, ctx.config.completed_list_limit))
        .map_err(|e| tag(e, op, &request_id))
        .map_err(|e| {
            log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            e
        })?;

    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        row_count = summaries.len()
    );
    Ok(summaries)
}

fn sort_for_listing(mut orders: Vec<Order>, status: OrderStatus, limit: usize) -> Vec<OrderSummary> {
    match status {
        OrderStatus::Open => {
            orders.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        }
        OrderStatus::Completed => {
            orders.sort_by(|a, b| {
                b.finished_at
                    .cmp(&a.finished_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            orders.truncate(limit);
        }
    }
    orders.iter().map(OrderSummary::from).collect()
}
