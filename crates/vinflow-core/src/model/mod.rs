pub mod identity;
pub mod inventory;
pub mod order;
pub mod profile;
pub mod row;

pub use identity::Identity;
pub use inventory::InventoryItem;
pub use order::{Order, OrderKind, OrderStatus};
pub use profile::{Actor, Role, UserProfile};
pub use row::{OrderRow, RowKind, RowSteps, StepRecord, VehicleAttributes};
