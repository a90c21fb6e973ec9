//! Order creation
//!
//! Validates submitted rows, pre-fills them from the inventory and derives the
//! order header. Nothing is persisted here; the caller commits the returned
//! [`NewOrder`] as one unit.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vinflow_core_types::OrderId;

use crate::authz::can_create_kind;
use crate::config::WorkflowConfig;
use crate::errors::{Result, WorkflowError};
use crate::model::{
    Actor, Identity, InventoryItem, Order, OrderKind, OrderRow, OrderStatus, RowKind, RowSteps,
};
use crate::rules::canonical_vin;

/// One row as submitted by the requester
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInput {
    pub vin: String,
    pub kind: RowKind,
    #[serde(default)]
    pub shoot_place: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    /// Origin to use when the inventory has no entry for the VIN
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl RowInput {
    fn destination(&self) -> Option<&str> {
        let field = match self.kind {
            RowKind::Shoot => self.shoot_place.as_deref(),
            RowKind::Move => self.to_location.as_deref(),
        };
        field.map(str::trim).filter(|d| !d.is_empty())
    }
}

/// Order header and rows ready to be committed together
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order: Order,
    /// Sorted by VIN
    pub rows: Vec<OrderRow>,
}

/// Canonical VINs of the inputs, for prefetching inventory entries
pub fn lookup_keys(inputs: &[RowInput]) -> BTreeSet<String> {
    inputs
        .iter()
        .map(|r| canonical_vin(&r.vin))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Build a new open order from submitted rows
///
/// `inventory` maps canonical VINs to their inventory entries.
///
/// # Errors
/// * `Validation` - no rows, a row without VIN, destination or origin, or a duplicate VIN
/// * `Unauthorized` - the actor may not create one of the row kinds
pub fn plan_order(
    actor: &Actor,
    inputs: &[RowInput],
    inventory: &BTreeMap<String, InventoryItem>,
    config: &WorkflowConfig,
    at: DateTime<Utc>,
) -> Result<NewOrder> {
    if inputs.is_empty() {
        return Err(WorkflowError::Validation {
            reason: "an order needs at least one row".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut rows = Vec::with_capacity(inputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        let vin = canonical_vin(&input.vin);
        if vin.is_empty() {
            return Err(WorkflowError::Validation {
                reason: format!("row {}: VIN is required", idx + 1),
            });
        }

        let destination = input.destination().ok_or_else(|| WorkflowError::Validation {
            reason: format!("row {} ({}): destination is required", idx + 1, vin),
        })?;

        if !seen.insert(vin.clone()) {
            return Err(WorkflowError::Validation {
                reason: format!("row {}: VIN {} appears more than once", idx + 1, vin),
            });
        }

        let stock = inventory.get(&vin);
        let from_location = stock
            .map(|s| s.location.trim().to_string())
            .or_else(|| input.from_location.as_deref().map(|l| l.trim().to_string()))
            .filter(|l| !l.is_empty())
            .ok_or_else(|| WorkflowError::Validation {
                reason: format!("row {} ({}): origin location is unknown", idx + 1, vin),
            })?;

        if !can_create_kind(actor, input.kind, config) {
            return Err(WorkflowError::Unauthorized {
                actor_uid: actor.identity.uid.clone(),
                reason: format!("may not create {} rows", input.kind.as_str()),
            });
        }

        let (shoot_place, to_location) = match input.kind {
            RowKind::Shoot => (Some(destination.to_string()), None),
            RowKind::Move => (None, Some(destination.to_string())),
        };

        rows.push(OrderRow {
            vin,
            kind: input.kind,
            attributes: stock.map(InventoryItem::attributes).unwrap_or_default(),
            location: from_location.clone(),
            from_location,
            shoot_place,
            to_location,
            steps: RowSteps::default(),
            note: input.note.trim().to_string(),
            created_at: at,
            updated_at: at,
        });
    }

    rows.sort_by(|a, b| a.vin.cmp(&b.vin));

    let kind = OrderKind::derive(rows.iter().map(|r| r.kind)).ok_or_else(|| {
        WorkflowError::Internal {
            message: "non-empty row set derived no kind".to_string(),
        }
    })?;

    let order = Order {
        id: OrderId::generate(),
        kind,
        status: OrderStatus::Open,
        created_by: Identity {
            uid: actor.identity.uid.clone(),
            email: actor.identity.email.clone(),
            name: actor.display_name(),
        },
        created_at: at,
        updated_at: at,
        total: rows.len() as u32,
        finished_at: None,
        finished_by: None,
    };

    Ok(NewOrder { order, rows })
}
