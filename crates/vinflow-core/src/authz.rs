//! Authorization rules
//!
//! Every decision about who may advance which row goes through
//! [`capability`], a single role x step matrix over a small context derived
//! from the actor, the row and the order.

use crate::config::WorkflowConfig;
use crate::model::{Actor, Order, OrderRow, Role, RowKind};
use crate::steps::Step;

/// Facts about one (actor, row, order) triple the matrix decides on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    pub row_kind: RowKind,
    /// Actor is affiliated with the row's origin location
    pub at_origin: bool,
    /// Actor is affiliated with the row's destination
    pub at_destination: bool,
    /// Actor created the order
    pub is_creator: bool,
}

impl StepContext {
    pub fn of(actor: &Actor, row: &OrderRow, order: &Order) -> Self {
        Self {
            row_kind: row.kind,
            at_origin: actor.has_location(&row.from_location),
            at_destination: row.destination().is_some_and(|d| actor.has_location(d)),
            is_creator: actor.identity.same_person(&order.created_by),
        }
    }
}

/// Capability matrix: may `role` perform `step` in `ctx`?
///
/// Steps 1 and 2 happen at the origin. Step 3 is confirmed at the destination
/// for shoot rows and by the requester for move rows.
pub fn capability(role: Role, step: Step, ctx: &StepContext) -> bool {
    match (role, step) {
        (Role::Admin, _) => true,
        (Role::BranchCoordinator, Step::Received | Step::Sent) => ctx.at_origin,
        (Role::BranchCoordinator, Step::CarReceived) => match ctx.row_kind {
            RowKind::Move => ctx.is_creator,
            RowKind::Shoot => ctx.at_destination,
        },
        // branch managers hold no step capability
        (Role::BranchManager, _) => false,
    }
}

/// Whether `actor` may perform `step` on `row` of `order`
pub fn can_perform(actor: &Actor, row: &OrderRow, step: Step, order: &Order) -> bool {
    match actor.role() {
        Some(role) => capability(role, step, &StepContext::of(actor, row, order)),
        None => false,
    }
}

/// Whether `actor` may create rows of `kind`
///
/// Move rows are open to everyone. Shoot rows need an admin or the
/// configured shoot-privileged identity.
pub fn can_create_kind(actor: &Actor, kind: RowKind, config: &WorkflowConfig) -> bool {
    match kind {
        RowKind::Move => true,
        RowKind::Shoot => actor.is_admin() || config.is_shoot_privileged(&actor.identity),
    }
}

/// Whether `actor` may close `order`: admins and the creator
pub fn can_finish(actor: &Actor, order: &Order) -> bool {
    actor.is_admin() || actor.identity.same_person(&order.created_by)
}
