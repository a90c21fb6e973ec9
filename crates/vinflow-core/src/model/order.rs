use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vinflow_core_types::OrderId;

use super::identity::Identity;
use super::row::RowKind;

/// Kind of an order, derived from the kinds of its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Shoot,
    Move,
    Mixed,
}

impl OrderKind {
    /// Derive the order kind from the kinds of its rows
    ///
    /// Returns `None` for an empty row set.
    pub fn derive<I>(kinds: I) -> Option<OrderKind>
    where
        I: IntoIterator<Item = RowKind>,
    {
        let mut shoot = false;
        let mut moves = false;
        for kind in kinds {
            match kind {
                RowKind::Shoot => shoot = true,
                RowKind::Move => moves = true,
            }
        }
        match (shoot, moves) {
            (true, true) => Some(OrderKind::Mixed),
            (true, false) => Some(OrderKind::Shoot),
            (false, true) => Some(OrderKind::Move),
            (false, false) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Shoot => "shoot",
            OrderKind::Move => "move",
            OrderKind::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Option<OrderKind> {
        match s {
            "shoot" => Some(OrderKind::Shoot),
            "move" => Some(OrderKind::Move),
            "mixed" => Some(OrderKind::Mixed),
            _ => None,
        }
    }
}

/// Order status; the only transition is open -> completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "open" => Some(OrderStatus::Open),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

/// One fulfillment request grouping a set of vehicle rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub created_by: Identity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Row count at creation
    pub total: u32,
    pub finished_at: Option<DateTime<Utc>>,
    pub finished_by: Option<Identity>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}
