use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use vinflow_core_types::OrderId;

use crate::apply::{apply_finish, apply_step_writes, AppliedOutcome};
use crate::errors::{ExError, ExErrorKind, WorkflowError};
use crate::model::{InventoryItem, Order, OrderRow, OrderStatus, UserProfile};
use crate::ops::{FinishWriteSet, NewOrder, StepWriteSet};
use crate::ports::{
    InventoryLookup, OrderSnapshot, OrderStore, PortResult, ProfileDirectory,
};
use crate::rules::canonical_vin;
use crate::rules::invariants::check_order;

#[derive(Debug, Default)]
struct Inner {
    orders: BTreeMap<OrderId, Order>,
    /// Rows per order, sorted by VIN
    rows: BTreeMap<OrderId, Vec<OrderRow>>,
    profiles: BTreeMap<String, UserProfile>,
    inventory: BTreeMap<String, InventoryItem>,
}

/// In-memory store for orders, profiles and inventory
///
/// Every commit takes the write lock for its whole read-check-write cycle,
/// which gives the same compare-and-set guarantees as the SQLite store.
#[derive(Debug, Default)]
pub struct Store {
    inner: RwLock<Inner>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PortResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> PortResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| poisoned())
    }

    /// Insert or replace the profile for `uid`
    ///
    /// # Errors
    /// `Internal` if the lock is poisoned.
    pub fn put_profile(&self, uid: impl Into<String>, profile: UserProfile) -> PortResult<()> {
        self.write()?.profiles.insert(uid.into(), profile);
        Ok(())
    }

    /// Insert or replace an inventory entry, keyed by its canonical VIN
    ///
    /// # Errors
    /// `Internal` if the lock is poisoned.
    pub fn put_inventory(&self, mut item: InventoryItem) -> PortResult<()> {
        item.vin = canonical_vin(&item.vin);
        self.write()?.inventory.insert(item.vin.clone(), item);
        Ok(())
    }

    /// Place an order into the store without any checks
    ///
    /// Lets tests stage records that no workflow operation would produce.
    ///
    /// # Errors
    /// `Internal` if the lock is poisoned.
    pub fn insert_raw(&self, order: Order, mut rows: Vec<OrderRow>) -> PortResult<()> {
        rows.sort_by(|a, b| a.vin.cmp(&b.vin));
        let mut inner = self.write()?;
        inner.rows.insert(order.id.clone(), rows);
        inner.orders.insert(order.id.clone(), order);
        Ok(())
    }

    /// Number of stored orders, any status
    ///
    /// # Errors
    /// `Internal` if the lock is poisoned.
    pub fn order_count(&self) -> PortResult<usize> {
        Ok(self.read()?.orders.len())
    }
}

fn poisoned() -> ExError {
    ExError::new(ExErrorKind::Internal).with_message("store lock poisoned")
}

fn not_found(op: &str, id: &OrderId) -> ExError {
    ExError::from(WorkflowError::OrderNotFound {
        order_id: id.to_string(),
    })
    .with_op(op)
}

impl OrderStore for Store {
    fn load_order(&self, id: &OrderId) -> PortResult<Option<OrderSnapshot>> {
        let inner = self.read()?;
        let Some(order) = inner.orders.get(id) else {
            return Ok(None);
        };
        let rows = inner.rows.get(id).cloned().unwrap_or_default();
        check_order(order, &rows).map_err(|e| ExError::from(e).with_op("load_order"))?;
        Ok(Some(OrderSnapshot {
            order: order.clone(),
            rows,
        }))
    }

    fn list_orders(&self, status: OrderStatus) -> PortResult<Vec<Order>> {
        Ok(self
            .read()?
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }

    fn commit_new_order(&self, new_order: &NewOrder) -> PortResult<()> {
        let mut inner = self.write()?;
        let id = &new_order.order.id;
        if inner.orders.contains_key(id) {
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit_new_order")
                .with_order_id(id.as_str())
                .with_message("order id already exists"));
        }
        let mut rows = new_order.rows.clone();
        rows.sort_by(|a, b| a.vin.cmp(&b.vin));
        inner.rows.insert(id.clone(), rows);
        inner.orders.insert(id.clone(), new_order.order.clone());
        Ok(())
    }

    fn commit_steps(&self, writes: &StepWriteSet) -> PortResult<AppliedOutcome> {
        let mut guard = self.write()?;
        let inner = &mut *guard;
        let order = inner
            .orders
            .get_mut(&writes.order_id)
            .ok_or_else(|| not_found("commit_steps", &writes.order_id))?;
        let rows = inner.rows.entry(writes.order_id.clone()).or_default();

        // apply_step_writes leaves both untouched on error
        apply_step_writes(order, rows, writes).map_err(|e| {
            ExError::from(e)
                .with_op("commit_steps")
                .with_step(writes.step.number())
        })
    }

    fn commit_finish(&self, writes: &FinishWriteSet) -> PortResult<Order> {
        let mut guard = self.write()?;
        let inner = &mut *guard;
        let order = inner
            .orders
            .get_mut(&writes.order_id)
            .ok_or_else(|| not_found("commit_finish", &writes.order_id))?;
        let rows = inner
            .rows
            .get(&writes.order_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        apply_finish(order, rows, writes)
            .map_err(|e| ExError::from(e).with_op("commit_finish"))?;
        Ok(order.clone())
    }
}

impl ProfileDirectory for Store {
    fn profile(&self, uid: &str) -> PortResult<Option<UserProfile>> {
        Ok(self.read()?.profiles.get(uid).cloned())
    }
}

impl InventoryLookup for Store {
    fn find(&self, vin: &str) -> PortResult<Option<InventoryItem>> {
        Ok(self.read()?.inventory.get(&canonical_vin(vin)).cloned())
    }
}
