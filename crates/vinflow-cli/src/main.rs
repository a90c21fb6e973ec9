//! vinflow CLI
//!
//! Command-line front-end for vehicle shoot and move orders

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vinflow_core::logging_facility::{init, Profile};

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "vinflow")]
#[command(about = "vinflow - Vehicle shoot and move order workflow", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, default_value = ".vinflow/store.db")]
    pub db: PathBuf,

    /// Workflow configuration (TOML); a missing file means defaults
    #[arg(long, global = true, default_value = ".vinflow/config.toml")]
    pub config: PathBuf,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Uid of the acting user
    #[arg(long, global = true)]
    pub uid: Option<String>,

    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Display name of the acting user
    #[arg(long, global = true)]
    pub name: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Order operations
    Order(commands::order::OrderArgs),
    /// Profile directory maintenance
    Profile(commands::profile::ProfileArgs),
    /// Inventory maintenance
    Inventory(commands::inventory::InventoryArgs),
}

fn main() {
    let cli = Cli::parse();
    init(Profile::for_cli(cli.global.log_json));

    let result = match cli.command {
        Commands::Order(args) => commands::order::execute(&cli.global, args),
        Commands::Profile(args) => commands::profile::execute(&cli.global, args),
        Commands::Inventory(args) => commands::inventory::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
