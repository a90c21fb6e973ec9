//! Command orchestration layer
//!
//! High-level operations that resolve the actor, read through the ports,
//! run the pure workflow planners and commit their write sets.

pub mod engine_command;
pub mod engine_query;
pub mod orders;
pub mod read_tools;
