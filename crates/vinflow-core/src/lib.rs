//! vinflow core - vehicle transfer workflow kernel
//!
//! Pure workflow logic for shoot and move orders:
//! - Order, row, identity and profile models
//! - VIN canonicalization and persisted-record invariants
//! - The role and location capability matrix
//! - The per-row three-step state machine
//! - Planning of creation, batch step and completion write sets
//! - Progress and per-actor views
//!
//! Nothing here touches storage. Operations take the state they need and
//! return write sets; [`apply`] commits them in memory with compare-and-set
//! semantics, and [`ports`] defines the seams a durable store plugs into.

pub mod apply;
pub mod authz;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod ports;
pub mod rules;
pub mod steps;

// Used by the exported logging macros
pub use vinflow_core_types;

pub use apply::{apply_finish, apply_step_writes, AppliedOutcome};
pub use config::WorkflowConfig;
pub use errors::{ExError, ExErrorKind, Result, WorkflowError};
pub use model::{
    Actor, Identity, InventoryItem, Order, OrderKind, OrderRow, OrderStatus, Role, RowKind,
    UserProfile,
};
pub use ops::Store;
pub use ports::{
    Clock, IdentityProvider, InventoryLookup, OrderSnapshot, OrderStore, ProfileDirectory,
    StaticIdentity, SystemClock,
};
pub use steps::{RowState, Step};
