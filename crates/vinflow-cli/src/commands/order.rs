//! Order commands
//!
//! Usage: vinflow --uid <UID> order <create|step|finish|progress|show|list>

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::json;
use vinflow_core::ops::RowInput;
use vinflow_core::vinflow_core_types::OrderId;
use vinflow_engine::{
    apply_engine_command, apply_engine_query, EngineCommand, EngineCommandResult, EngineQuery,
};

use super::{print_json, read_json, CliResult, Session};
use crate::GlobalArgs;

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Create an order from a JSON array of rows
    Create {
        /// File holding `[{"vin": ..., "kind": "move", "toLocation": ...}, ...]`
        rows: PathBuf,
    },
    /// Apply step 1 (received), 2 (sent) or 3 (car received)
    Step {
        order_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        step: u8,
    },
    /// Close an order whose rows have all arrived
    Finish { order_id: String },
    /// Print the completion percentage
    Progress { order_id: String },
    /// Print an order with its rows
    Show { order_id: String },
    /// List open orders, or completed ones with --completed
    List {
        #[arg(long)]
        completed: bool,
    },
}

pub fn execute(global: &GlobalArgs, args: OrderArgs) -> CliResult {
    let session = Session::open(global)?;
    let ctx = session.ctx();

    match args.command {
        OrderCommand::Create { rows } => {
            let rows: Vec<RowInput> = read_json(&rows)?;
            match apply_engine_command(EngineCommand::CreateOrder { rows }, &ctx)? {
                EngineCommandResult::CreateOrder { order_id } => {
                    print_json(&json!({ "orderId": order_id }))
                }
                other => print_json(&other),
            }
        }
        OrderCommand::Step { order_id, step } => {
            let cmd = EngineCommand::ApplyStep {
                order_id: OrderId::from(order_id),
                step,
            };
            match apply_engine_command(cmd, &ctx)? {
                EngineCommandResult::ApplyStep(outcome) => print_json(&outcome),
                other => print_json(&other),
            }
        }
        OrderCommand::Finish { order_id } => {
            let cmd = EngineCommand::FinishOrder {
                order_id: OrderId::from(order_id),
            };
            match apply_engine_command(cmd, &ctx)? {
                EngineCommandResult::FinishOrder(order) => print_json(&order),
                other => print_json(&other),
            }
        }
        OrderCommand::Progress { order_id } => {
            let query = EngineQuery::Progress {
                order_id: OrderId::from(order_id),
            };
            print_json(&apply_engine_query(query, &ctx)?)
        }
        OrderCommand::Show { order_id } => {
            let query = EngineQuery::OrderDetail {
                order_id: OrderId::from(order_id),
            };
            print_json(&apply_engine_query(query, &ctx)?)
        }
        OrderCommand::List { completed } => {
            let query = if completed {
                EngineQuery::ListCompleted
            } else {
                EngineQuery::ListOpen
            };
            print_json(&apply_engine_query(query, &ctx)?)
        }
    }
}
