#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use vinflow_core::model::{Actor, Identity, InventoryItem, Role, RowKind, UserProfile};
use vinflow_core::ops::{plan_order, NewOrder, RowInput};
use vinflow_core::WorkflowConfig;
use vinflow_store::SqliteStore;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap()
}

pub fn later(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("in-memory store")
}

pub fn profile(role: Role, locations: &[&str]) -> UserProfile {
    UserProfile {
        name: "Lina".to_string(),
        email: "lina@example.com".to_string(),
        role,
        locations: locations.iter().map(|l| l.to_string()).collect(),
    }
}

pub fn admin() -> Actor {
    Actor::new(
        Identity::new("uid-admin", "admin@example.com", "Admin"),
        Some(profile(Role::Admin, &[])),
    )
}

pub fn stock(vin: &str, location: &str) -> InventoryItem {
    InventoryItem {
        vin: vin.to_string(),
        car: "Passat".to_string(),
        variant: "Variant".to_string(),
        ext_color: "Blue".to_string(),
        int_color: "Grey".to_string(),
        model_year: "2023".to_string(),
        location: location.to_string(),
    }
}

pub fn move_row(vin: &str, to: &str) -> RowInput {
    RowInput {
        vin: vin.to_string(),
        kind: RowKind::Move,
        shoot_place: None,
        to_location: Some(to.to_string()),
        from_location: None,
        note: "handle with care".to_string(),
    }
}

pub fn two_row_order() -> NewOrder {
    let inventory: BTreeMap<String, InventoryItem> = [("VIN1", "A"), ("VIN2", "A")]
        .iter()
        .map(|(v, l)| (v.to_string(), stock(v, l)))
        .collect();
    plan_order(
        &admin(),
        &[move_row("VIN1", "B"), move_row("VIN2", "C")],
        &inventory,
        &WorkflowConfig::default(),
        t0(),
    )
    .unwrap()
}
