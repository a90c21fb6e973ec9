//! Engine-level read-only query surface
//!
//! `apply_engine_query` is the single entry point for read-only queries.
//! Unlike `apply_engine_command`, none of its arms ever commits a write set.

#![allow(clippy::result_large_err)]

use serde::Serialize;
use vinflow_core_types::OrderId;

use crate::commands::read_tools::{self, OrderDetail, OrderSummary};
use crate::context::Collaborators;
use crate::Result;

/// Read-only queries supported by the engine
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// Completion percentage of one order
    Progress { order_id: OrderId },
    /// One order with its rows as seen by the signed-in actor
    OrderDetail { order_id: OrderId },
    ListOpen,
    ListCompleted,
}

/// Result of an engine query
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EngineQueryResult {
    Progress {
        #[serde(rename = "orderId")]
        order_id: OrderId,
        progress: u8,
    },
    OrderDetail(Box<OrderDetail>),
    Orders(Vec<OrderSummary>),
}

/// Run a read-only query
///
/// # Errors
/// Whatever the underlying query reports.
pub fn apply_engine_query(query: EngineQuery, ctx: &Collaborators<'_>) -> Result<EngineQueryResult> {
    match query {
        EngineQuery::Progress { order_id } => {
            let progress = read_tools::get_progress(ctx, &order_id)?;
            Ok(EngineQueryResult::Progress { order_id, progress })
        }
        EngineQuery::OrderDetail { order_id } => {
            let detail = read_tools::order_detail(ctx, &order_id)?;
            Ok(EngineQueryResult::OrderDetail(Box::new(detail)))
        }
        EngineQuery::ListOpen => read_tools::list_open_orders(ctx).map(EngineQueryResult::Orders),
        EngineQuery::ListCompleted => {
            read_tools::list_completed_orders(ctx).map(EngineQueryResult::Orders)
        }
    }
}
