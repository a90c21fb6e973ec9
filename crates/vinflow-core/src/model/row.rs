use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::steps::Step;

/// Kind of one row, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Photography: the vehicle goes to a shoot place
    Shoot,
    /// Relocation: the vehicle goes to another location
    Move,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Shoot => "shoot",
            RowKind::Move => "move",
        }
    }

    pub fn parse(s: &str) -> Option<RowKind> {
        match s {
            "shoot" => Some(RowKind::Shoot),
            "move" => Some(RowKind::Move),
            _ => None,
        }
    }
}

/// Descriptive attributes copied from the inventory; opaque to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAttributes {
    pub car: String,
    pub variant: String,
    pub ext_color: String,
    pub int_color: String,
    pub model_year: String,
}

/// Who performed a step and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub at: DateTime<Utc>,
    pub by_uid: String,
    pub by_email: String,
    pub by_name: String,
}

/// The three checkpoints of a row; absence means not yet performed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSteps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_received: Option<StepRecord>,
}

impl RowSteps {
    pub fn get(&self, step: Step) -> Option<&StepRecord> {
        match step {
            Step::Received => self.received.as_ref(),
            Step::Sent => self.sent.as_ref(),
            Step::CarReceived => self.car_received.as_ref(),
        }
    }

    pub fn has(&self, step: Step) -> bool {
        self.get(step).is_some()
    }

    pub(crate) fn slot_mut(&mut self, step: Step) -> &mut Option<StepRecord> {
        match step {
            Step::Received => &mut self.received,
            Step::Sent => &mut self.sent,
            Step::CarReceived => &mut self.car_received,
        }
    }
}

/// One vehicle within an order, keyed by canonical VIN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub vin: String,
    pub kind: RowKind,
    #[serde(flatten)]
    pub attributes: VehicleAttributes,
    pub from_location: String,
    /// Set only when kind is shoot
    pub shoot_place: Option<String>,
    /// Set only when kind is move
    pub to_location: Option<String>,
    /// Current physical location
    pub location: String,
    #[serde(default)]
    pub steps: RowSteps,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Destination chosen at creation: shoot place or move target
    pub fn destination(&self) -> Option<&str> {
        match self.kind {
            RowKind::Shoot => self.shoot_place.as_deref(),
            RowKind::Move => self.to_location.as_deref(),
        }
    }

    pub fn has_arrived(&self) -> bool {
        self.steps.car_received.is_some()
    }
}
