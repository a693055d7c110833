use serde_json::{json, Value};

use retailgrid::state::claims::{ClaimDraft, ClaimError};
use retailgrid::state::config::TableConfig;
use retailgrid::state::data_model::{ClaimRecord, Row, RowId};
use retailgrid::state::table_engine::{TableEngine, TableEvent};
use retailgrid::SelectionChange;

fn row(value: Value) -> Row {
    serde_json::from_value(value).unwrap()
}

fn claims_engine() -> TableEngine {
    TableEngine::from_rows(
        TableConfig::default(),
        vec![
            row(json!({"id": "P1", "name": "Apples", "quantity": 6})),
            row(json!({"id": "P2", "name": "Bread", "quantity": 2, "isLocked": true})),
            row(json!({"id": "P3", "name": "Cheese", "alreadyclaimed": true})),
            row(json!({"id": "P4", "name": "Dates"})),
        ],
    )
}

fn id(value: &str) -> RowId {
    RowId::new(value)
}

#[test]
fn test_submitted_claim_is_merged_into_a_new_row_view() {
    let mut engine = claims_engine();
    let claim = engine
        .submit_claim(
            &id("P1"),
            ClaimDraft::new(" Damaged ", 2, "Apples").with_description("bruised"),
        )
        .unwrap();
    assert_eq!(claim.reason, "Damaged");

    let view = engine.row(&id("P1")).unwrap();
    assert_eq!(view.claim.as_ref(), Some(&claim));
    assert_eq!(engine.claim(&id("P1")), Some(&claim));

    let original = &engine.data()[0].rows[0];
    assert!(original.claim.is_none());
}

#[test]
fn test_claimed_row_leaves_selection() {
    let mut engine = claims_engine();
    engine.toggle(&id("P1"));
    engine.toggle(&id("P4"));
    engine.take_events();

    engine
        .submit_claim(&id("P1"), ClaimDraft::new("Missing", 1, "Apples"))
        .unwrap();
    assert_eq!(engine.selected_ids(), vec![id("P4")]);
    assert!(!engine.toggle(&id("P1")));

    let events = engine.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        TableEvent::RowsSelected(SelectionChange { has_selection: true, rows }) if rows.len() == 1
    ));
}

#[test]
fn test_locked_and_claimed_rows_reject_claims() {
    let mut engine = claims_engine();
    assert_eq!(
        engine.submit_claim(&id("P2"), ClaimDraft::new("Damaged", 1, "Bread")),
        Err(ClaimError::RowLocked(id("P2")))
    );
    assert_eq!(
        engine.submit_claim(&id("P3"), ClaimDraft::new("Damaged", 1, "Cheese")),
        Err(ClaimError::AlreadyClaimed(id("P3")))
    );

    engine
        .submit_claim(&id("P4"), ClaimDraft::new("Damaged", 1, "Dates"))
        .unwrap();
    assert_eq!(
        engine.submit_claim(&id("P4"), ClaimDraft::new("Damaged", 1, "Dates")),
        Err(ClaimError::AlreadyClaimed(id("P4")))
    );
}

#[test]
fn test_unknown_row_rejects_claim() {
    let mut engine = claims_engine();
    let claim = ClaimRecord {
        reason: "Damaged".to_string(),
        quantity: 1,
        description: String::new(),
        image: None,
        product: "Ghost".to_string(),
    };
    assert_eq!(
        engine.attach_claim(&id("P9"), claim),
        Err(ClaimError::UnknownRow(id("P9")))
    );
}

#[test]
fn test_draft_validation() {
    let mut engine = claims_engine();
    assert_eq!(
        engine.submit_claim(&id("P1"), ClaimDraft::new("  ", 1, "Apples")),
        Err(ClaimError::MissingReason)
    );
    assert_eq!(
        engine.submit_claim(&id("P1"), ClaimDraft::new("Damaged", 1, "")),
        Err(ClaimError::MissingProduct)
    );
    assert_eq!(
        engine.submit_claim(&id("P1"), ClaimDraft::new("Damaged", 7, "Apples")),
        Err(ClaimError::InvalidQuantity {
            requested: 7,
            available: Some(6)
        })
    );
    assert_eq!(
        engine.submit_claim(&id("P4"), ClaimDraft::new("Damaged", 0, "Dates")),
        Err(ClaimError::InvalidQuantity {
            requested: 0,
            available: None
        })
    );
    assert!(engine.claim(&id("P1")).is_none());
}

#[test]
fn test_blank_image_is_dropped() {
    let mut engine = claims_engine();
    let claim = engine
        .submit_claim(&id("P4"), ClaimDraft::new("Damaged", 1, "Dates").with_image(" "))
        .unwrap();
    assert_eq!(claim.image, None);
}

#[test]
fn test_claims_are_dropped_with_the_data_set() {
    let mut engine = claims_engine();
    engine
        .submit_claim(&id("P1"), ClaimDraft::new("Damaged", 1, "Apples"))
        .unwrap();

    engine.replace_rows(vec![row(json!({"id": "P1", "name": "Apples", "quantity": 6}))]);
    assert!(engine.claim(&id("P1")).is_none());
    assert_eq!(engine.is_selectable(&id("P1")), Some(true));
}

#[test]
fn test_claim_error_messages() {
    assert_eq!(ClaimError::RowLocked(id("P2")).to_string(), "row P2 is locked");
    assert_eq!(
        ClaimError::InvalidQuantity {
            requested: 9,
            available: Some(3)
        }
        .to_string(),
        "claim quantity 9 must be between 1 and 3"
    );
}
