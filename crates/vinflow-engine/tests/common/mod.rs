#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use vinflow_core::model::{Identity, InventoryItem, Role, RowKind, UserProfile};
use vinflow_core::ops::RowInput;
use vinflow_core::ports::{Clock, InventoryLookup, OrderStore, ProfileDirectory, StaticIdentity};
use vinflow_core::{Store, WorkflowConfig};
use vinflow_engine::Collaborators;
use vinflow_store::SqliteStore;

pub const ADMIN_UID: &str = "uid-admin";
pub const COORD_A_UID: &str = "uid-coord-a";
pub const COORD_B_UID: &str = "uid-coord-b";
pub const COORD_C_UID: &str = "uid-coord-c";
pub const MANAGER_UID: &str = "uid-manager";
pub const GUEST_UID: &str = "uid-guest";
pub const SHOOT_EMAIL: &str = "studio.lead@example.com";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap()
}

/// Clock that only moves when told to
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Mutex::new(at))
    }

    pub fn advance(&self, secs: i64) {
        let mut now = self.0.lock().unwrap();
        *now += Duration::seconds(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Storage backends the engine runs against in tests
pub trait Backend: OrderStore + ProfileDirectory + InventoryLookup {
    fn add_profile(&self, uid: &str, profile: UserProfile);
    fn add_stock(&self, item: InventoryItem);
}

impl Backend for Store {
    fn add_profile(&self, uid: &str, profile: UserProfile) {
        self.put_profile(uid, profile).unwrap();
    }

    fn add_stock(&self, item: InventoryItem) {
        self.put_inventory(item).unwrap();
    }
}

impl Backend for SqliteStore {
    fn add_profile(&self, uid: &str, profile: UserProfile) {
        self.set_profile(uid, &profile).unwrap();
    }

    fn add_stock(&self, item: InventoryItem) {
        self.import_inventory(&[item]).unwrap();
    }
}

pub struct Harness<S> {
    pub store: S,
    pub clock: FixedClock,
    pub config: WorkflowConfig,
}

impl<S: Backend> Harness<S> {
    /// Seed the standard users and stock into `store`
    pub fn new(store: S) -> Self {
        let profile = |uid: &str, role: Role, locations: &[&str]| UserProfile {
            name: uid.to_uppercase(),
            email: email(uid),
            role,
            locations: locations.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
        };
        store.add_profile(ADMIN_UID, profile(ADMIN_UID, Role::Admin, &[]));
        store.add_profile(COORD_A_UID, profile(COORD_A_UID, Role::BranchCoordinator, &["A"]));
        store.add_profile(COORD_B_UID, profile(COORD_B_UID, Role::BranchCoordinator, &["B"]));
        store.add_profile(COORD_C_UID, profile(COORD_C_UID, Role::BranchCoordinator, &["C"]));
        store.add_profile(
            MANAGER_UID,
            profile(MANAGER_UID, Role::BranchManager, &["A", "B", "C"]),
        );
        for vin in ["VIN0000001", "VIN0000002", "VIN0000009"] {
            store.add_stock(stock(vin, "A"));
        }

        Self {
            store,
            clock: FixedClock::new(t0()),
            config: WorkflowConfig {
                shoot_privileged_email: Some(SHOOT_EMAIL.to_string()),
                ..WorkflowConfig::default()
            },
        }
    }

    pub fn ctx<'a>(&'a self, identity: &'a StaticIdentity) -> Collaborators<'a> {
        Collaborators {
            store: &self.store,
            identity,
            profiles: &self.store,
            inventory: &self.store,
            clock: &self.clock,
            config: &self.config,
        }
    }
}

pub fn in_memory() -> Harness<Store> {
    Harness::new(Store::new())
}

pub fn sqlite() -> Harness<SqliteStore> {
    Harness::new(SqliteStore::open_in_memory().unwrap())
}

pub fn email(uid: &str) -> String {
    format!("{}@example.com", uid)
}

pub fn as_user(uid: &str) -> StaticIdentity {
    StaticIdentity::signed_in(Identity::new(uid, email(uid), ""))
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

/// VIN0000001 to B and VIN0000002 to C, both from A, requested by coordinator A
pub fn two_row_move_rows() -> Vec<RowInput> {
    vec![move_row("vin0000001", "B"), move_row(" VIN 0000002 ", "C")]
}
