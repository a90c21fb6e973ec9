//! Inventory commands
//!
//! Usage: vinflow inventory import <PATH>

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::json;
use vinflow_core::model::InventoryItem;

use super::{print_json, read_json, CliResult, Session};
use crate::GlobalArgs;

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Load a JSON array of inventory entries, replacing entries with the same VIN
    Import { path: PathBuf },
}

pub fn execute(global: &GlobalArgs, args: InventoryArgs) -> CliResult {
    let session = Session::open(global)?;
    match args.command {
        InventoryCommand::Import { path } => {
            let items: Vec<InventoryItem> = read_json(&path)?;
            let imported = session.store.import_inventory(&items)?;
            tracing::info!(count = imported, path = %path.display(), "inventory imported");
            print_json(&json!({ "imported": imported }))
        }
    }
}
