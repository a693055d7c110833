use serde_json::{json, Value};

use retailgrid::state::columns;
use retailgrid::state::data_model::{Column, Row};

fn row(value: Value) -> Row {
    serde_json::from_value(value).unwrap()
}

fn config() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("vat", "VAT"),
        Column::new("gross", "Gross"),
    ]
}

#[test]
fn test_empty_rows_keep_every_column() {
    let rows: Vec<Row> = Vec::new();
    assert_eq!(columns::resolve_visible(&config(), &rows), config());
}

#[test]
fn test_column_without_values_is_hidden() {
    let rows = vec![
        row(json!({"name": "Apple", "gross": "£10.00"})),
        row(json!({"name": "Banana", "gross": "£2.50"})),
    ];
    let fields: Vec<String> = columns::resolve_visible(&config(), &rows)
        .into_iter()
        .map(|c| c.field)
        .collect();
    assert_eq!(fields, vec!["name", "gross"]);
}

#[test]
fn test_only_vat_column_with_no_values_resolves_empty() {
    let cols = vec![Column::new("vat", "VAT")];
    let rows = vec![row(json!({"name": "Apple"})), row(json!({"name": "Pear"}))];
    assert!(columns::resolve_visible(&cols, &rows).is_empty());
}

#[test]
fn test_null_and_whitespace_count_as_blank() {
    let rows = vec![
        row(json!({"vat": null})),
        row(json!({"vat": "   "})),
        row(json!({"vat": ""})),
    ];
    let cols = vec![Column::new("vat", "VAT")];
    assert!(columns::resolve_visible(&cols, &rows).is_empty());
}

#[test]
fn test_zero_and_false_count_as_values() {
    let rows = vec![row(json!({"vat": 0, "promo": false}))];
    let cols = vec![Column::new("vat", "VAT"), Column::new("promo", "Promo")];
    assert_eq!(columns::resolve_visible(&cols, &rows), cols);
}

#[test]
fn test_one_non_blank_value_is_enough() {
    let rows = vec![
        row(json!({"vat": ""})),
        row(json!({"vat": "20%"})),
    ];
    let cols = vec![Column::new("vat", "VAT")];
    assert_eq!(columns::resolve_visible(&cols, &rows), cols);
}

#[test]
fn test_visible_columns_keep_configured_order_and_are_a_subset() {
    let rows = vec![row(json!({"gross": "1", "name": "x"}))];
    let visible = columns::resolve_visible(&config(), &rows);
    assert!(visible.iter().all(|c| config().contains(c)));
    assert_eq!(visible[0].field, "name");
    assert_eq!(visible[1].field, "gross");
}

#[test]
fn test_truncate_respects_max_chars() {
    let column = Column::new("description", "Description").with_max_chars(6);
    assert_eq!(column.truncate("Short"), "Short");
    assert_eq!(column.truncate("Sparkling water"), "Spark…");

    let unlimited = Column::new("description", "Description");
    assert_eq!(unlimited.truncate("Sparkling water"), "Sparkling water");
}
