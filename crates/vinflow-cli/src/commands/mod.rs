//! Subcommand handlers
//!
//! Each handler opens a [`Session`], runs one engine call and prints the
//! result as JSON on stdout.

pub mod inventory;
pub mod order;
pub mod profile;

use serde::Serialize;
use vinflow_core::model::Identity;
use vinflow_core::ports::{StaticIdentity, SystemClock};
use vinflow_core::WorkflowConfig;
use vinflow_engine::Collaborators;
use vinflow_store::SqliteStore;

use crate::GlobalArgs;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opened store, loaded configuration and the acting identity for one run
pub struct Session {
    pub store: SqliteStore,
    identity: StaticIdentity,
    config: WorkflowConfig,
    clock: SystemClock,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> CliResult<Self> {
        let config = crate::config::load(&global.config)?;
        let store = SqliteStore::open(&global.db)?;
        let identity = match &global.uid {
            Some(uid) => StaticIdentity::signed_in(Identity::new(
                uid.as_str(),
                global.email.clone().unwrap_or_default(),
                global.name.clone().unwrap_or_default(),
            )),
            None => StaticIdentity::anonymous(),
        };
        Ok(Self {
            store,
            identity,
            config,
            clock: SystemClock,
        })
    }

    pub fn ctx(&self) -> Collaborators<'_> {
        Collaborators {
            store: &self.store,
            identity: &self.identity,
            profiles: &self.store,
            inventory: &self.store,
            clock: &self.clock,
            config: &self.config,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a JSON file into `T`
pub fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let value: T = serde_json::from_str(&text)
        .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))?;
    Ok(value)
}
