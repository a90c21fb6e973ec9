//! Collaborator interfaces
//!
//! The workflow logic never talks to a database, an auth service or the stock
//! list directly. It reaches them through these traits so the in-memory
//! [`Store`](crate::ops::Store) and the SQLite store are interchangeable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vinflow_core_types::OrderId;

use crate::apply::AppliedOutcome;
use crate::errors::{ExError, ExErrorKind};
use crate::model::{Identity, InventoryItem, Order, OrderRow, OrderStatus, UserProfile};
use crate::ops::{FinishWriteSet, NewOrder, StepWriteSet};

pub type PortResult<T> = Result<T, ExError>;

/// An order header with all of its rows, read at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order: Order,
    /// Sorted by VIN
    pub rows: Vec<OrderRow>,
}

/// Durable storage of orders and rows
///
/// Implementations must make each `commit_*` call atomic. `commit_steps` and
/// `commit_finish` are compare-and-set: they re-check their preconditions
/// against the stored state inside the same transaction as the write.
#[allow(clippy::result_large_err)]
pub trait OrderStore: Send + Sync {
    /// # Errors
    /// `CorruptRecord` when the stored order breaks a workflow invariant,
    /// `Persistence` on storage failure.
    fn load_order(&self, id: &OrderId) -> PortResult<Option<OrderSnapshot>>;

    /// Headers of every order with the given status, in no particular order
    ///
    /// # Errors
    /// `Persistence` on storage failure.
    fn list_orders(&self, status: OrderStatus) -> PortResult<Vec<Order>>;

    /// Insert a new order and its rows as one unit
    ///
    /// # Errors
    /// `Concurrency` if the order id already exists, `Persistence` on storage failure.
    fn commit_new_order(&self, new_order: &NewOrder) -> PortResult<()>;

    /// # Errors
    /// `NotFound` for an unknown order, `Concurrency` when no stamp still
    /// satisfied its precondition.
    fn commit_steps(&self, writes: &StepWriteSet) -> PortResult<AppliedOutcome>;

    /// # Errors
    /// `NotFound` for an unknown order, `Concurrency` when the order was closed
    /// meanwhile or a row has not arrived.
    fn commit_finish(&self, writes: &FinishWriteSet) -> PortResult<Order>;
}

/// Source of the signed-in identity
#[allow(clippy::result_large_err)]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    /// `Unauthorised` when nobody is signed in.
    fn current(&self) -> PortResult<Identity>;
}

/// Profile lookup keyed by identity uid
#[allow(clippy::result_large_err)]
pub trait ProfileDirectory: Send + Sync {
    /// `Ok(None)` when the uid has no profile
    ///
    /// # Errors
    /// `Persistence` on storage failure.
    fn profile(&self, uid: &str) -> PortResult<Option<UserProfile>>;
}

/// Stock list lookup keyed by canonical VIN
#[allow(clippy::result_large_err)]
pub trait InventoryLookup: Send + Sync {
    /// # Errors
    /// `Persistence` on storage failure.
    fn find(&self, vin: &str) -> PortResult<Option<InventoryItem>>;
}

/// Source of the operation timestamp
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity fixed at construction; used by the CLI and by tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Identity>);

impl StaticIdentity {
    pub fn signed_in(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    #[allow(clippy::result_large_err)]
    fn current(&self) -> PortResult<Identity> {
        match &self.0 {
            Some(identity) if !identity.uid.trim().is_empty() => Ok(identity.clone()),
            Some(_) => Err(ExError::new(ExErrorKind::Unauthorised)
                .with_op("current_identity")
                .with_message("signed-in identity has no uid")),
            None => Err(ExError::new(ExErrorKind::Unauthorised)
                .with_op("current_identity")
                .with_message("no signed-in identity")),
        }
    }
}
