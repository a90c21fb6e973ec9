//! Hydration layer - turns table rows back into workflow models
//!
//! Columns are first read into plain records inside the rusqlite row
//! callback, then converted outside it so that a bad value becomes a
//! `CorruptRecord` naming the order rather than an opaque SQLite error.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use vinflow_core::model::{
    Identity, InventoryItem, Order, OrderKind, OrderRow, OrderStatus, Role, RowKind, RowSteps,
    StepRecord, UserProfile, VehicleAttributes,
};
use vinflow_core_types::OrderId;

use crate::errors::{corrupt, from_json, Result};

/// Column list matching [`OrderRecord::from_row`]
pub const ORDER_COLUMNS: &str = "id, kind, status, created_by_uid, created_by_email, \
     created_by_name, total, created_at, updated_at, finished_at, finished_by_uid, \
     finished_by_email, finished_by_name";

/// Column list matching [`RowRecord::from_row`]
pub const ROW_COLUMNS: &str = "vin, kind, car, variant, ext_color, int_color, model_year, \
     from_location, shoot_place, to_location, location, note, step_received, step_sent, \
     step_car_received, created_at, updated_at";

/// Encode a timestamp as fixed-width RFC 3339 UTC text
pub fn encode_ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_ts(order_id: &str, column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(order_id, format!("{} is not a timestamp: {}", column, e)))
}

/// Encode a step record as its JSON column value
pub fn encode_step(record: &StepRecord) -> Result<String> {
    serde_json::to_string(record).map_err(|e| from_json("encode_step", e))
}

fn decode_step(order_id: &str, vin: &str, raw: Option<String>) -> Result<Option<StepRecord>> {
    raw.map(|json| {
        serde_json::from_str(&json)
            .map_err(|e| corrupt(order_id, format!("row {} step record: {}", vin, e)))
    })
    .transpose()
}

pub struct OrderRecord {
    id: String,
    kind: String,
    status: String,
    created_by: (String, String, String),
    total: i64,
    created_at: String,
    updated_at: String,
    finished_at: Option<String>,
    finished_by: (Option<String>, Option<String>, Option<String>),
}

impl OrderRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            status: row.get(2)?,
            created_by: (row.get(3)?, row.get(4)?, row.get(5)?),
            total: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            finished_at: row.get(9)?,
            finished_by: (row.get(10)?, row.get(11)?, row.get(12)?),
        })
    }

    pub fn into_order(self) -> Result<Order> {
        let id = self.id.as_str();
        let kind = OrderKind::parse(&self.kind)
            .ok_or_else(|| corrupt(id, format!("unknown order kind {}", self.kind)))?;
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| corrupt(id, format!("unknown status {}", self.status)))?;
        let total = u32::try_from(self.total)
            .map_err(|_| corrupt(id, format!("total {} out of range", self.total)))?;

        let finished_by = match self.finished_by {
            (Some(uid), Some(email), Some(name)) => Some(Identity { uid, email, name }),
            (None, None, None) => None,
            _ => return Err(corrupt(id, "closer identity is partially recorded")),
        };
        let finished_at = self
            .finished_at
            .as_deref()
            .map(|raw| decode_ts(id, "finished_at", raw))
            .transpose()?;

        let (uid, email, name) = self.created_by;
        Ok(Order {
            id: OrderId::from(self.id.clone()),
            kind,
            status,
            created_by: Identity { uid, email, name },
            created_at: decode_ts(id, "created_at", &self.created_at)?,
            updated_at: decode_ts(id, "updated_at", &self.updated_at)?,
            total,
            finished_at,
            finished_by,
        })
    }
}

pub struct RowRecord {
    vin: String,
    kind: String,
    attributes: VehicleAttributes,
    from_location: String,
    shoot_place: Option<String>,
    to_location: Option<String>,
    location: String,
    note: String,
    steps: [Option<String>; 3],
    created_at: String,
    updated_at: String,
}

impl RowRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            vin: row.get(0)?,
            kind: row.get(1)?,
            attributes: VehicleAttributes {
                car: row.get(2)?,
                variant: row.get(3)?,
                ext_color: row.get(4)?,
                int_color: row.get(5)?,
                model_year: row.get(6)?,
            },
            from_location: row.get(7)?,
            shoot_place: row.get(8)?,
            to_location: row.get(9)?,
            location: row.get(10)?,
            note: row.get(11)?,
            steps: [row.get(12)?, row.get(13)?, row.get(14)?],
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }

    pub fn into_row(self, order_id: &str) -> Result<OrderRow> {
        let kind = RowKind::parse(&self.kind).ok_or_else(|| {
            corrupt(order_id, format!("row {} has unknown kind {}", self.vin, self.kind))
        })?;
        let [received, sent, car_received] = self.steps;
        let steps = RowSteps {
            received: decode_step(order_id, &self.vin, received)?,
            sent: decode_step(order_id, &self.vin, sent)?,
            car_received: decode_step(order_id, &self.vin, car_received)?,
        };

        Ok(OrderRow {
            created_at: decode_ts(order_id, "created_at", &self.created_at)?,
            updated_at: decode_ts(order_id, "updated_at", &self.updated_at)?,
            vin: self.vin,
            kind,
            attributes: self.attributes,
            from_location: self.from_location,
            shoot_place: self.shoot_place,
            to_location: self.to_location,
            location: self.location,
            steps,
            note: self.note,
        })
    }
}

/// Map a profiles row (name, email, role, locations_json)
pub fn profile_from_columns(
    uid: &str,
    name: String,
    email: String,
    role: &str,
    locations_json: &str,
) -> Result<UserProfile> {
    let role = Role::parse(role).ok_or_else(|| {
        vinflow_core::ExError::new(vinflow_core::ExErrorKind::CorruptRecord)
            .with_op("load_profile")
            .with_message(format!("profile {} has unknown role {}", uid, role))
    })?;
    let locations = serde_json::from_str(locations_json).map_err(|e| from_json("load_profile", e))?;
    Ok(UserProfile {
        name,
        email,
        role,
        locations,
    })
}

/// Map an inventory row (vin, car, variant, ext_color, int_color, model_year, location)
pub fn inventory_from_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        vin: row.get(0)?,
        car: row.get(1)?,
        variant: row.get(2)?,
        ext_color: row.get(3)?,
        int_color: row.get(4)?,
        model_year: row.get(5)?,
        location: row.get(6)?,
    })
}
