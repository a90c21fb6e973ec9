use serde::{Deserialize, Serialize};

use super::row::VehicleAttributes;

/// One vehicle in the external inventory, read only at row creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub vin: String,
    #[serde(default)]
    pub car: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub ext_color: String,
    #[serde(default)]
    pub int_color: String,
    #[serde(default)]
    pub model_year: String,
    /// Where the vehicle currently is
    pub location: String,
}

impl InventoryItem {
    /// Descriptive attributes copied onto a new row
    pub fn attributes(&self) -> VehicleAttributes {
        VehicleAttributes {
            car: self.car.clone(),
            variant: self.variant.clone(),
            ext_color: self.ext_color.clone(),
            int_color: self.int_color.clone(),
            model_year: self.model_year.clone(),
        }
    }
}
