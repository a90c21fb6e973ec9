//! Collaborator bundle handed to every engine operation

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use vinflow_core::errors::WorkflowError;
use vinflow_core::model::{Actor, InventoryItem};
use vinflow_core::ops::{lookup_keys, RowInput};
use vinflow_core::ports::{
    Clock, IdentityProvider, InventoryLookup, OrderSnapshot, OrderStore, ProfileDirectory,
};
use vinflow_core::WorkflowConfig;
use vinflow_core_types::OrderId;

use crate::Result;

/// Borrowed trait objects for the ports an operation may reach
///
/// The in-memory `Store` and `SqliteStore` each implement the three storage
/// ports, so the same value usually fills `store`, `profiles` and `inventory`.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub store: &'a dyn OrderStore,
    pub identity: &'a dyn IdentityProvider,
    pub profiles: &'a dyn ProfileDirectory,
    pub inventory: &'a dyn InventoryLookup,
    pub clock: &'a dyn Clock,
    pub config: &'a WorkflowConfig,
}

impl<'a> Collaborators<'a> {
    /// Signed-in identity joined with its profile, if any
    ///
    /// # Errors
    /// `Unauthorised` when nobody is signed in, `Persistence` on lookup failure.
    pub fn actor(&self) -> Result<Actor> {
        let identity = self.identity.current()?;
        let profile = self.profiles.profile(&identity.uid)?;
        Ok(Actor::new(identity, profile))
    }

    /// # Errors
    /// `NotFound` for an unknown order, plus whatever the store reports.
    pub fn snapshot(&self, order_id: &OrderId) -> Result<OrderSnapshot> {
        self.store.load_order(order_id)?.ok_or_else(|| {
            WorkflowError::OrderNotFound {
                order_id: order_id.to_string(),
            }
            .into()
        })
    }

    /// Inventory entries for the submitted rows, keyed by canonical VIN
    ///
    /// # Errors
    /// `Persistence` on lookup failure.
    pub fn prefetch_inventory(&self, inputs: &[RowInput]) -> Result<BTreeMap<String, InventoryItem>> {
        let mut found = BTreeMap::new();
        for vin in lookup_keys(inputs) {
            if let Some(item) = self.inventory.find(&vin)? {
                found.insert(vin, item);
            }
        }
        Ok(found)
    }
}
