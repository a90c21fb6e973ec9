//! Durable order store over one SQLite connection
//!
//! Each port call runs in its own transaction. Step and finish commits use
//! `IMMEDIATE` transactions so the compare-and-set re-checks and the writes
//! happen under the database write lock, which also serializes writers in
//! other processes sharing the file.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};
use vinflow_core::apply::AppliedOutcome;
use vinflow_core::errors::{ExError, ExErrorKind};
use vinflow_core::model::{InventoryItem, Order, OrderStatus, UserProfile};
use vinflow_core::ops::{FinishWriteSet, NewOrder, StepWriteSet};
use vinflow_core::ports::{
    InventoryLookup, OrderSnapshot, OrderStore, PortResult, ProfileDirectory,
};
use vinflow_core::rules::canonical_vin;
use vinflow_core::rules::invariants::check_order;
use vinflow_core_types::OrderId;

use crate::db;
use crate::errors::{from_rusqlite, io_error, lock_poisoned, Result};
use crate::migrations::apply_migrations;
use crate::repo::SqliteRepo;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error("open_store", e))?;
        }
        let mut conn = db::open(path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Fresh in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned())
    }

    /// Run `f` with the raw connection, for maintenance and tests
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&*conn)
    }

    /// Insert or replace the profile for `uid`
    pub fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let conn = self.lock()?;
        SqliteRepo::upsert_profile(&conn, uid, profile)
    }

    /// Load inventory entries in one transaction, canonicalizing VINs
    ///
    /// Returns the number of entries written. An entry without VIN or
    /// location aborts the whole import.
    pub fn import_inventory(&self, items: &[InventoryItem]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        for (idx, item) in items.iter().enumerate() {
            let vin = canonical_vin(&item.vin);
            if vin.is_empty() || item.location.trim().is_empty() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("import_inventory")
                    .with_message(format!("entry {} needs a VIN and a location", idx + 1)));
            }
            let entry = InventoryItem {
                vin,
                location: item.location.trim().to_string(),
                ..item.clone()
            };
            SqliteRepo::upsert_inventory(&tx, &entry)?;
        }
        tx.commit().map_err(from_rusqlite)?;
        Ok(items.len())
    }
}

impl OrderStore for SqliteStore {
    fn load_order(&self, id: &OrderId) -> PortResult<Option<OrderSnapshot>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let Some(order) = SqliteRepo::load_order(&tx, id)? else {
            return Ok(None);
        };
        let rows = SqliteRepo::load_rows(&tx, id)?;
        tx.commit().map_err(from_rusqlite)?;

        check_order(&order, &rows).map_err(|e| ExError::from(e).with_op("load_order"))?;
        Ok(Some(OrderSnapshot { order, rows }))
    }

    fn list_orders(&self, status: OrderStatus) -> PortResult<Vec<Order>> {
        let conn = self.lock()?;
        SqliteRepo::list_orders(&conn, status)
    }

    fn commit_new_order(&self, new_order: &NewOrder) -> PortResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        let id = &new_order.order.id;

        if SqliteRepo::order_exists(&tx, id)? {
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit_new_order")
                .with_order_id(id.as_str())
                .with_message("order id already exists"));
        }
        SqliteRepo::insert_order(&tx, &new_order.order)?;
        for row in &new_order.rows {
            SqliteRepo::insert_row(&tx, id, row).map_err(|e| e.with_vin(row.vin.clone()))?;
        }
        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }

    fn commit_steps(&self, writes: &StepWriteSet) -> PortResult<AppliedOutcome> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        let id = &writes.order_id;

        if !SqliteRepo::order_exists(&tx, id)? {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("commit_steps")
                .with_order_id(id.as_str())
                .with_message("Order not found"));
        }

        let mut outcome = AppliedOutcome::default();
        for stamp in &writes.stamps {
            if SqliteRepo::stamp_row(&tx, id, writes.step, stamp, &writes.at)? {
                outcome.applied.push(stamp.vin.clone());
            } else {
                outcome.excluded.push(stamp.vin.clone());
            }
        }

        if outcome.applied.is_empty() {
            // dropping tx rolls back
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit_steps")
                .with_order_id(id.as_str())
                .with_step(writes.step.number())
                .with_vins(outcome.excluded)
                .with_message(format!(
                    "step {} was already applied or became invalid for every target",
                    writes.step.number()
                )));
        }

        SqliteRepo::touch_order(&tx, id, &writes.at)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(outcome)
    }

    fn commit_finish(&self, writes: &FinishWriteSet) -> PortResult<Order> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        let id = &writes.order_id;

        if !SqliteRepo::finish_order(&tx, id, &writes.finished_at, &writes.finished_by)? {
            let err = if SqliteRepo::order_exists(&tx, id)? {
                ExError::new(ExErrorKind::Concurrency)
                    .with_message("order was closed meanwhile or a row has not arrived")
            } else {
                ExError::new(ExErrorKind::NotFound).with_message("Order not found")
            };
            return Err(err.with_op("commit_finish").with_order_id(id.as_str()));
        }

        let order = SqliteRepo::load_order(&tx, id)?.ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("commit_finish")
                .with_order_id(id.as_str())
                .with_message("finished order vanished inside its transaction")
        })?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(order)
    }
}

impl ProfileDirectory for SqliteStore {
    fn profile(&self, uid: &str) -> PortResult<Option<UserProfile>> {
        let conn = self.lock()?;
        SqliteRepo::load_profile(&conn, uid)
    }
}

impl InventoryLookup for SqliteStore {
    fn find(&self, vin: &str) -> PortResult<Option<InventoryItem>> {
        let conn = self.lock()?;
        SqliteRepo::find_inventory(&conn, &canonical_vin(vin))
    }
}
