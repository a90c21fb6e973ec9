//! Profile directory commands
//!
//! Usage: vinflow profile set <UID> --role <ROLE> [--location <LOC>]...

use clap::{Args, Subcommand};
use vinflow_core::model::{Role, UserProfile};

use super::{print_json, CliResult, Session};
use crate::GlobalArgs;

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Insert or replace the profile of a uid
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub uid: String,

    /// admin, branch_coordinator or branch_manager
    #[arg(long, value_parser = parse_role)]
    pub role: Role,

    #[arg(long = "profile-name", default_value = "")]
    pub profile_name: String,

    #[arg(long = "profile-email", default_value = "")]
    pub profile_email: String,

    /// Affiliated location; repeat for several
    #[arg(long = "location")]
    pub locations: Vec<String>,
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| {
        format!(
            "unknown role '{}' (expected admin, branch_coordinator or branch_manager)",
            s
        )
    })
}

pub fn execute(global: &GlobalArgs, args: ProfileArgs) -> CliResult {
    let session = Session::open(global)?;
    match args.command {
        ProfileCommand::Set(set) => {
            let profile = UserProfile {
                name: set.profile_name,
                email: set.profile_email,
                role: set.role,
                locations: set
                    .locations
                    .into_iter()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect(),
            };
            session.store.set_profile(&set.uid, &profile)?;
            tracing::info!(uid = set.uid.as_str(), role = profile.role.as_str(), "profile set");
            print_json(&profile)
        }
    }
}
