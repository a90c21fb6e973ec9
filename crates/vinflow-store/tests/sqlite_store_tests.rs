mod common;

use common::*;
use rusqlite::params;
use vinflow_core::model::{OrderStatus, Role};
use vinflow_core::ops::{plan_finish, plan_step};
use vinflow_core::{ExErrorKind, InventoryLookup, OrderStore, ProfileDirectory, Step};

#[test]
fn test_new_order_round_trips_exactly() {
    let store = store();
    let new_order = two_row_order();

    store.commit_new_order(&new_order).unwrap();
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();

    assert_eq!(snap.order, new_order.order);
    assert_eq!(snap.rows, new_order.rows);
}

#[test]
fn test_sub_second_timestamps_survive() {
    let store = store();
    let mut new_order = two_row_order();
    let at = t0() + chrono::Duration::nanoseconds(123_456_789);
    new_order.order.created_at = at;
    new_order.order.updated_at = at;

    store.commit_new_order(&new_order).unwrap();
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();
    assert_eq!(snap.order.updated_at, at);
}

#[test]
fn test_duplicate_order_id_is_concurrency_error() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();

    let err = store.commit_new_order(&new_order).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
}

#[test]
fn test_step_commit_is_compare_and_set() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();

    // two plans from the same snapshot
    let first = plan_step(Step::Received, &admin(), &snap.order, &snap.rows, later(1)).unwrap();
    let second = plan_step(Step::Received, &admin(), &snap.order, &snap.rows, later(2)).unwrap();

    let outcome = store.commit_steps(&first).unwrap();
    assert_eq!(outcome.applied, vec!["VIN1", "VIN2"]);

    let err = store.commit_steps(&second).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
    assert_eq!(err.vins(), Some(&["VIN1".to_string(), "VIN2".to_string()][..]));

    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();
    assert_eq!(snap.order.updated_at, later(1));
    assert!(snap.rows.iter().all(|r| r.steps.received.as_ref().unwrap().at == later(1)));
}

#[test]
fn test_partial_conflict_commits_the_rest() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();
    let full = plan_step(Step::Received, &admin(), &snap.order, &snap.rows, later(1)).unwrap();

    // a concurrent writer stamps VIN1 only
    let mut only_first = full.clone();
    only_first.stamps.truncate(1);
    store.commit_steps(&only_first).unwrap();

    let outcome = store.commit_steps(&full).unwrap();
    assert_eq!(outcome.applied, vec!["VIN2"]);
    assert_eq!(outcome.excluded, vec!["VIN1"]);
}

#[test]
fn test_skipped_step_is_refused_by_the_store_too() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();

    // forge a step-2 write set without step 1
    let mut forged = plan_step(Step::Received, &admin(), &snap.order, &snap.rows, later(1)).unwrap();
    forged.step = Step::Sent;

    let err = store.commit_steps(&forged).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);
    let snap = store.load_order(&new_order.order.id).unwrap().unwrap();
    assert!(snap.rows.iter().all(|r| r.steps.sent.is_none()));
}

#[test]
fn test_full_lifecycle_and_conditional_finish() {
    let store = store();
    let new_order = two_row_order();
    let id = new_order.order.id.clone();
    store.commit_new_order(&new_order).unwrap();

    for (i, step) in Step::ALL.into_iter().enumerate() {
        let snap = store.load_order(&id).unwrap().unwrap();
        let ws = plan_step(step, &admin(), &snap.order, &snap.rows, later(i as i64 + 1)).unwrap();
        store.commit_steps(&ws).unwrap();
    }

    let snap = store.load_order(&id).unwrap().unwrap();
    let locations: Vec<&str> = snap.rows.iter().map(|r| r.location.as_str()).collect();
    assert_eq!(locations, vec!["B", "C"]);

    let fin = plan_finish(&admin(), &snap.order, &snap.rows, later(10)).unwrap();
    let finished = store.commit_finish(&fin).unwrap();
    assert_eq!(finished.status, OrderStatus::Completed);
    assert_eq!(finished.finished_by.as_ref().unwrap().uid, "uid-admin");

    let err = store.commit_finish(&fin).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);

    assert!(store.list_orders(OrderStatus::Open).unwrap().is_empty());
    assert_eq!(store.list_orders(OrderStatus::Completed).unwrap().len(), 1);
}

#[test]
fn test_finish_with_unarrived_row_is_rejected_by_the_store() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();

    // bypass the guard: a finish write set against an unarrived order
    let fin = vinflow_core::ops::FinishWriteSet {
        order_id: new_order.order.id.clone(),
        finished_at: later(5),
        finished_by: admin().identity,
    };
    let err = store.commit_finish(&fin).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Concurrency);

    let missing = vinflow_core::ops::FinishWriteSet {
        order_id: "nope".into(),
        ..fin
    };
    assert_eq!(store.commit_finish(&missing).unwrap_err().kind(), ExErrorKind::NotFound);
}

#[test]
fn test_tampered_row_surfaces_as_corrupt_record() {
    let store = store();
    let new_order = two_row_order();
    store.commit_new_order(&new_order).unwrap();

    store
        .with_connection(|conn| {
            conn.execute(
                "UPDATE order_rows SET location = 'Z' WHERE order_id = ?1 AND vin = 'VIN1'",
                params![new_order.order.id.as_str()],
            )
            .map_err(vinflow_store::errors::from_rusqlite)?;
            Ok(())
        })
        .unwrap();

    let err = store.load_order(&new_order.order.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptRecord);
}

#[test]
fn test_profiles_and_inventory() {
    let store = store();

    store
        .set_profile("u1", &profile(Role::BranchCoordinator, &["A", "B"]))
        .unwrap();
    let loaded = store.profile("u1").unwrap().unwrap();
    assert_eq!(loaded.role, Role::BranchCoordinator);
    assert!(loaded.locations.contains("B"));
    assert!(store.profile("u2").unwrap().is_none());

    // upsert replaces
    store.set_profile("u1", &profile(Role::Admin, &[])).unwrap();
    assert_eq!(store.profile("u1").unwrap().unwrap().role, Role::Admin);

    let count = store
        .import_inventory(&[stock(" vin 9 ", "A "), stock("VIN8", "B")])
        .unwrap();
    assert_eq!(count, 2);
    let item = store.find("vin9").unwrap().unwrap();
    assert_eq!(item.vin, "VIN9");
    assert_eq!(item.location, "A");
}

#[test]
fn test_inventory_import_is_all_or_nothing() {
    let store = store();
    let err = store
        .import_inventory(&[stock("VIN1", "A"), stock("", "B")])
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(store.find("VIN1").unwrap().is_none());
}
