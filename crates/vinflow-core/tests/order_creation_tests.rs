mod common;

use common::*;
use vinflow_core::ops::{lookup_keys, plan_order, RowInput};
use vinflow_core::{OrderKind, OrderStatus, RowKind, WorkflowError};

#[test]
fn test_plan_order_canonicalizes_and_prefills_from_inventory() {
    let inputs = vec![RowInput {
        note: "  front bumper scratched ".to_string(),
        ..move_row(" vin 0000001 ", "B")
    }];

    let new_order = plan_order(
        &coordinator_a(),
        &inputs,
        &inventory(&[("VIN0000001", "A")]),
        &config(),
        t0(),
    )
    .unwrap();

    let row = &new_order.rows[0];
    assert_eq!(row.vin, "VIN0000001");
    assert_eq!(row.attributes.car, "Golf");
    assert_eq!(row.from_location, "A");
    assert_eq!(row.location, "A");
    assert_eq!(row.to_location.as_deref(), Some("B"));
    assert_eq!(row.shoot_place, None);
    assert_eq!(row.note, "front bumper scratched");

    let order = &new_order.order;
    assert_eq!(order.kind, OrderKind::Move);
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.total, 1);
    assert_eq!(order.created_by.uid, COORD_A_UID);
    // profile name wins over the empty identity display name
    assert_eq!(order.created_by.name, "UID-COORD-A");
}

#[test]
fn test_plan_order_derives_mixed_kind_and_sorts_rows() {
    let new_order = plan_order(
        &admin(),
        &[move_row("VIN2", "C"), shoot_row("VIN1", "Studio")],
        &inventory(&[("VIN1", "A"), ("VIN2", "A")]),
        &config(),
        t0(),
    )
    .unwrap();

    assert_eq!(new_order.order.kind, OrderKind::Mixed);
    let vins: Vec<&str> = new_order.rows.iter().map(|r| r.vin.as_str()).collect();
    assert_eq!(vins, vec!["VIN1", "VIN2"]);
}

#[test]
fn test_plan_order_drops_destination_of_the_other_kind() {
    let input = RowInput {
        to_location: Some("C".to_string()),
        ..shoot_row("VIN1", "Studio")
    };
    let new_order = plan_order(
        &admin(),
        &[input],
        &inventory(&[("VIN1", "A")]),
        &config(),
        t0(),
    )
    .unwrap();

    assert_eq!(new_order.rows[0].shoot_place.as_deref(), Some("Studio"));
    assert_eq!(new_order.rows[0].to_location, None);
}

#[test]
fn test_plan_order_uses_submitted_origin_when_not_in_inventory() {
    let input = RowInput {
        from_location: Some("A".to_string()),
        ..move_row("VINX", "B")
    };
    let new_order = plan_order(
        &coordinator_a(),
        &[input],
        &inventory(&[]),
        &config(),
        t0(),
    )
    .unwrap();

    assert_eq!(new_order.rows[0].from_location, "A");
    assert_eq!(new_order.rows[0].attributes.car, "");
}

#[test]
fn test_plan_order_validation_errors() {
    let inv = inventory(&[("VIN1", "A")]);
    let cases: Vec<Vec<RowInput>> = vec![
        vec![],
        vec![move_row("   ", "B")],
        vec![move_row("VIN1", " ")],
        vec![move_row("VIN1", "B"), move_row("vin1", "C")],
        vec![move_row("UNKNOWN", "B")],
    ];

    for inputs in cases {
        let result = plan_order(&admin(), &inputs, &inv, &config(), t0());
        assert!(
            matches!(result, Err(WorkflowError::Validation { .. })),
            "expected validation error for {inputs:?}, got {result:?}"
        );
    }
}

#[test]
fn test_shoot_rows_need_admin_or_privileged_identity() {
    let inv = inventory(&[("VIN1", "A")]);
    let rows = [shoot_row("VIN1", "Studio")];

    let err = plan_order(&coordinator_a(), &rows, &inv, &config(), t0()).unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthorized { .. }));

    let mut privileged = coordinator_a();
    privileged.identity.email = SHOOT_EMAIL.to_uppercase();
    let new_order = plan_order(&privileged, &rows, &inv, &config(), t0()).unwrap();
    assert_eq!(new_order.rows[0].kind, RowKind::Shoot);
}

#[test]
fn test_lookup_keys_are_canonical_and_unique() {
    let keys = lookup_keys(&[move_row("ab 1", "B"), move_row("AB1", "C"), move_row("", "C")]);
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["AB1".to_string()]);
}
