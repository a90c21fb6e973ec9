//! vinflow engine - orchestration layer
//!
//! Wires the pure workflow functions of `vinflow-core` to the collaborator
//! ports: resolve the actor, load a snapshot, plan, commit. Every public
//! operation owns its lifecycle logging.

pub mod commands;
pub mod context;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
pub use commands::orders::{apply_step, create_order, finish_order};
pub use commands::read_tools::{
    get_progress, list_completed_orders, list_open_orders, order_detail, OrderDetail,
    OrderSummary, RowView,
};
pub use context::Collaborators;

/// Engine operations report the structured error type
pub type Result<T> = std::result::Result<T, vinflow_core::ExError>;
