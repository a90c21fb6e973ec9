//! Engine-level action commands

#![allow(clippy::result_large_err)]

use serde::Serialize;
use vinflow_core::apply::AppliedOutcome;
use vinflow_core::model::Order;
use vinflow_core::ops::RowInput;
use vinflow_core_types::OrderId;

use crate::commands::orders;
use crate::context::Collaborators;
use crate::Result;

/// Commands that write to the order store
#[derive(Debug, Clone)]
pub enum EngineCommand {
    CreateOrder { rows: Vec<RowInput> },
    ApplyStep { order_id: OrderId, step: u8 },
    FinishOrder { order_id: OrderId },
}

/// Result of applying an engine command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EngineCommandResult {
    CreateOrder {
        #[serde(rename = "orderId")]
        order_id: OrderId,
    },
    ApplyStep(AppliedOutcome),
    FinishOrder(Order),
}

/// Apply an engine command against the given collaborators
///
/// # Errors
/// Whatever the underlying operation reports.
pub fn apply_engine_command(
    cmd: EngineCommand,
    ctx: &Collaborators<'_>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::CreateOrder { rows } => {
            let order_id = orders::create_order(ctx, &rows)?;
            Ok(EngineCommandResult::CreateOrder { order_id })
        }
        EngineCommand::ApplyStep { order_id, step } => {
            let outcome = orders::apply_step(ctx, &order_id, step)?;
            Ok(EngineCommandResult::ApplyStep(outcome))
        }
        EngineCommand::FinishOrder { order_id } => {
            let order = orders::finish_order(ctx, &order_id)?;
            Ok(EngineCommandResult::FinishOrder(order))
        }
    }
}
