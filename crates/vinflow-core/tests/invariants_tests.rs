mod common;

use common::*;
use vinflow_core::model::{OrderKind, OrderStatus, StepRecord};
use vinflow_core::ops::apply_step;
use vinflow_core::rules::invariants::{check_order, check_row};
use vinflow_core::{ExErrorKind, OrderStore, Step, Store, WorkflowError};

fn record() -> StepRecord {
    StepRecord {
        at: t0(),
        by_uid: ADMIN_UID.to_string(),
        by_email: "admin@example.com".to_string(),
        by_name: "Admin".to_string(),
    }
}

fn is_corrupt<T: std::fmt::Debug>(result: vinflow_core::Result<T>) -> bool {
    matches!(result, Err(WorkflowError::CorruptRecord { .. }))
}

#[test]
fn test_freshly_planned_order_is_consistent() {
    let new_order = two_row_move_order();
    check_order(&new_order.order, &new_order.rows).unwrap();
}

#[test]
fn test_skipped_checkpoint_is_corrupt() {
    let mut row = two_row_move_order().rows.remove(0);
    row.steps.sent = Some(record());
    assert!(is_corrupt(check_row("o1", &row)));
}

#[test]
fn test_location_must_track_arrival() {
    let new_order = two_row_move_order();

    let mut moved_early = new_order.rows[0].clone();
    moved_early.location = "B".to_string();
    assert!(is_corrupt(check_row("o1", &moved_early)));

    let mut rows = new_order.rows.clone();
    for step in Step::ALL {
        rows = apply_step(step, &admin(), &new_order.order, &rows, later(1)).unwrap();
    }
    rows[0].location = "A".to_string();
    assert!(is_corrupt(check_row("o1", &rows[0])));
    check_row("o1", &rows[1]).unwrap();
}

#[test]
fn test_header_must_match_rows() {
    let new_order = two_row_move_order();

    let mut wrong_total = new_order.order.clone();
    wrong_total.total = 3;
    assert!(is_corrupt(check_order(&wrong_total, &new_order.rows)));

    let mut wrong_kind = new_order.order.clone();
    wrong_kind.kind = OrderKind::Shoot;
    assert!(is_corrupt(check_order(&wrong_kind, &new_order.rows)));

    let mut closed_early = new_order.order.clone();
    closed_early.status = OrderStatus::Completed;
    assert!(is_corrupt(check_order(&closed_early, &new_order.rows)));
}

#[test]
fn test_store_surfaces_corruption_on_load() {
    let new_order = two_row_move_order();
    let mut rows = new_order.rows.clone();
    rows[0].steps.car_received = Some(record());

    let store = Store::new();
    store.insert_raw(new_order.order.clone(), rows).unwrap();

    let err = store.load_order(&new_order.order.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::CorruptRecord);
    assert_eq!(err.order_id(), Some(new_order.order.id.as_str()));
}
