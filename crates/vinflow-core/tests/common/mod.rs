#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use vinflow_core::model::{Actor, Identity, InventoryItem, Role, RowKind, UserProfile};
use vinflow_core::ops::{plan_order, NewOrder, RowInput};
use vinflow_core::WorkflowConfig;

pub const ADMIN_UID: &str = "uid-admin";
pub const COORD_A_UID: &str = "uid-coord-a";
pub const COORD_B_UID: &str = "uid-coord-b";
pub const MANAGER_UID: &str = "uid-manager";
pub const SHOOT_EMAIL: &str = "studio.lead@example.com";

/// Fixed instant so tests can reason about timestamps
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap()
}

pub fn later(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn actor(uid: &str, role: Role, locations: &[&str]) -> Actor {
    let email = format!("{}@example.com", uid);
    Actor::new(
        Identity::new(uid, email.clone(), ""),
        Some(UserProfile {
            name: uid.to_uppercase(),
            email,
            role,
            locations: locations.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
        }),
    )
}

pub fn admin() -> Actor {
    actor(ADMIN_UID, Role::Admin, &[])
}

pub fn coordinator_a() -> Actor {
    actor(COORD_A_UID, Role::BranchCoordinator, &["A"])
}

pub fn coordinator_b() -> Actor {
    actor(COORD_B_UID, Role::BranchCoordinator, &["B"])
}

pub fn manager() -> Actor {
    actor(MANAGER_UID, Role::BranchManager, &["A", "B", "C"])
}

pub fn config() -> WorkflowConfig {
    WorkflowConfig {
        shoot_privileged_email: Some(SHOOT_EMAIL.to_string()),
        ..WorkflowConfig::default()
    }
}

pub fn stock(vin: &str, location: &str) -> InventoryItem {
    InventoryItem {
        vin: vin.to_string(),
        car: "Golf".to_string(),
        variant: "GTI".to_string(),
        ext_color: "Red".to_string(),
        int_color: "Black".to_string(),
        model_year: "2024".to_string(),
        location: location.to_string(),
    }
}

pub fn inventory(items: &[(&str, &str)]) -> BTreeMap<String, InventoryItem> {
    items
        .iter()
        .map(|(vin, loc)| (vin.to_string(), stock(vin, loc)))
        .collect()
}

pub fn move_row(vin: &str, to: &str) -> RowInput {
    RowInput {
        vin: vin.to_string(),
        kind: RowKind::Move,
        shoot_place: None,
        to_location: Some(to.to_string()),
        from_location: None,
        note: String::new(),
    }
}

pub fn shoot_row(vin: &str, place: &str) -> RowInput {
    RowInput {
        vin: vin.to_string(),
        kind: RowKind::Shoot,
        shoot_place: Some(place.to_string()),
        to_location: None,
        from_location: None,
        note: String::new(),
    }
}

/// Two move rows from A, to B and C, created by coordinator A
pub fn two_row_move_order() -> NewOrder {
    plan_order(
        &coordinator_a(),
        &[move_row("VIN0000001", "B"), move_row("VIN0000002", "C")],
        &inventory(&[("VIN0000001", "A"), ("VIN0000002", "A")]),
        &config(),
        t0(),
    )
    .unwrap()
}

/// One shoot row from A to studio B, created by an admin
pub fn one_row_shoot_order() -> NewOrder {
    plan_order(
        &admin(),
        &[shoot_row("VIN0000009", "B")],
        &inventory(&[("VIN0000009", "A")]),
        &config(),
        t0(),
    )
    .unwrap()
}
