//! SQLite repository implementation
//!
//! Statement-level access to the orders, order_rows, profiles and inventory
//! tables. Transactions are owned by the caller.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use vinflow_core::model::{
    Identity, InventoryItem, Order, OrderRow, OrderStatus, UserProfile,
};
use vinflow_core::ops::RowStamp;
use vinflow_core::steps::Step;
use vinflow_core_types::OrderId;

use crate::errors::{from_json, from_rusqlite, Result};
use crate::repo::hydration::{
    encode_step, encode_ts, inventory_from_row, profile_from_columns, OrderRecord, RowRecord,
    ORDER_COLUMNS, ROW_COLUMNS,
};

/// Column holding the record of `step`
fn step_column(step: Step) -> &'static str {
    match step {
        Step::Received => "step_received",
        Step::Sent => "step_sent",
        Step::CarReceived => "step_car_received",
    }
}

/// SQLite repository for orders and their reference data
pub struct SqliteRepo;

impl SqliteRepo {
    pub fn insert_order(conn: &Connection, order: &Order) -> Result<()> {
        let finished_by = order.finished_by.as_ref();
        conn.execute(
            "INSERT INTO orders (id, kind, status, created_by_uid, created_by_email,
                created_by_name, total, created_at, updated_at, finished_at,
                finished_by_uid, finished_by_email, finished_by_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                order.id.as_str(),
                order.kind.as_str(),
                order.status.as_str(),
                order.created_by.uid,
                order.created_by.email,
                order.created_by.name,
                order.total,
                encode_ts(&order.created_at),
                encode_ts(&order.updated_at),
                order.finished_at.as_ref().map(encode_ts),
                finished_by.map(|i| i.uid.as_str()),
                finished_by.map(|i| i.email.as_str()),
                finished_by.map(|i| i.name.as_str()),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn insert_row(conn: &Connection, order_id: &OrderId, row: &OrderRow) -> Result<()> {
        let step = |s: Step| row.steps.get(s).map(encode_step).transpose();
        conn.execute(
            "INSERT INTO order_rows (order_id, vin, kind, car, variant, ext_color, int_color,
                model_year, from_location, shoot_place, to_location, location, note,
                step_received, step_sent, step_car_received, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                order_id.as_str(),
                row.vin,
                row.kind.as_str(),
                row.attributes.car,
                row.attributes.variant,
                row.attributes.ext_color,
                row.attributes.int_color,
                row.attributes.model_year,
                row.from_location,
                row.shoot_place,
                row.to_location,
                row.location,
                row.note,
                step(Step::Received)?,
                step(Step::Sent)?,
                step(Step::CarReceived)?,
                encode_ts(&row.created_at),
                encode_ts(&row.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn order_exists(conn: &Connection, order_id: &OrderId) -> Result<bool> {
        conn.query_row(
            "SELECT 1 FROM orders WHERE id = ?1",
            [order_id.as_str()],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(from_rusqlite)
    }

    pub fn load_order(conn: &Connection, order_id: &OrderId) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        conn.query_row(&sql, [order_id.as_str()], OrderRecord::from_row)
            .optional()
            .map_err(from_rusqlite)?
            .map(OrderRecord::into_order)
            .transpose()
    }

    /// Rows of an order, sorted by VIN
    pub fn load_rows(conn: &Connection, order_id: &OrderId) -> Result<Vec<OrderRow>> {
        let sql = format!(
            "SELECT {} FROM order_rows WHERE order_id = ?1 ORDER BY vin",
            ROW_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let records = stmt
            .query_map([order_id.as_str()], RowRecord::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        records
            .into_iter()
            .map(|r| r.into_row(order_id.as_str()))
            .collect()
    }

    pub fn list_orders(conn: &Connection, status: OrderStatus) -> Result<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE status = ?1 ORDER BY updated_at DESC",
            ORDER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let records = stmt
            .query_map([status.as_str()], OrderRecord::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        records.into_iter().map(OrderRecord::into_order).collect()
    }

    /// Stamp one row if it still lacks `step` and holds the previous one
    ///
    /// Returns whether the row was written.
    pub fn stamp_row(
        conn: &Connection,
        order_id: &OrderId,
        step: Step,
        stamp: &RowStamp,
        at: &DateTime<Utc>,
    ) -> Result<bool> {
        let column = step_column(step);
        let precondition = match step.previous() {
            Some(prev) => format!("{} IS NULL AND {} IS NOT NULL", column, step_column(prev)),
            None => format!("{} IS NULL", column),
        };
        let sql = format!(
            "UPDATE order_rows
             SET {column} = ?1, location = COALESCE(?2, location), updated_at = ?3
             WHERE order_id = ?4 AND vin = ?5 AND {precondition}"
        );
        let changed = conn
            .execute(
                &sql,
                params![
                    encode_step(&stamp.record)?,
                    stamp.new_location,
                    encode_ts(at),
                    order_id.as_str(),
                    stamp.vin,
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    pub fn touch_order(conn: &Connection, order_id: &OrderId, at: &DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE orders SET updated_at = ?1 WHERE id = ?2",
            params![encode_ts(at), order_id.as_str()],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Close the order if it is open and every row has arrived
    ///
    /// Returns whether the order was written.
    pub fn finish_order(
        conn: &Connection,
        order_id: &OrderId,
        finished_at: &DateTime<Utc>,
        finished_by: &Identity,
    ) -> Result<bool> {
        let ts = encode_ts(finished_at);
        let changed = conn
            .execute(
                "UPDATE orders
                 SET status = 'completed', finished_at = ?1, updated_at = ?1,
                     finished_by_uid = ?2, finished_by_email = ?3, finished_by_name = ?4
                 WHERE id = ?5 AND status = 'open'
                   AND NOT EXISTS (
                       SELECT 1 FROM order_rows
                       WHERE order_rows.order_id = orders.id AND step_car_received IS NULL
                   )",
                params![
                    ts,
                    finished_by.uid,
                    finished_by.email,
                    finished_by.name,
                    order_id.as_str(),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    pub fn upsert_profile(conn: &Connection, uid: &str, profile: &UserProfile) -> Result<()> {
        let locations =
            serde_json::to_string(&profile.locations).map_err(|e| from_json("upsert_profile", e))?;
        conn.execute(
            "INSERT INTO profiles (uid, name, email, role, locations_json)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(uid) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                role = excluded.role,
                locations_json = excluded.locations_json",
            params![uid, profile.name, profile.email, profile.role.as_str(), locations],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn load_profile(conn: &Connection, uid: &str) -> Result<Option<UserProfile>> {
        let columns: Option<(String, String, String, String)> = conn
            .query_row(
                "SELECT name, email, role, locations_json FROM profiles WHERE uid = ?1",
                [uid],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(from_rusqlite)?;

        columns
            .map(|(name, email, role, locations)| {
                profile_from_columns(uid, name, email, &role, &locations)
            })
            .transpose()
    }

    /// Insert or replace an inventory entry; `item.vin` must already be canonical
    pub fn upsert_inventory(conn: &Connection, item: &InventoryItem) -> Result<()> {
        conn.execute(
            "INSERT INTO inventory (vin, car, variant, ext_color, int_color, model_year, location)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(vin) DO UPDATE SET
                car = excluded.car,
                variant = excluded.variant,
                ext_color = excluded.ext_color,
                int_color = excluded.int_color,
                model_year = excluded.model_year,
                location = excluded.location",
            params![
                item.vin,
                item.car,
                item.variant,
                item.ext_color,
                item.int_color,
                item.model_year,
                item.location,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn find_inventory(conn: &Connection, vin: &str) -> Result<Option<InventoryItem>> {
        conn.query_row(
            "SELECT vin, car, variant, ext_color, int_color, model_year, location
             FROM inventory WHERE vin = ?1",
            [vin],
            inventory_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }
}
