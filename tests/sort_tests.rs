use std::cmp::Ordering;

use serde_json::{json, Value};

use retailgrid::state::data_model::{self, Row};
use retailgrid::state::sort::{self, SortOrder, SortSpec, SortState};

fn row(value: Value) -> Row {
    serde_json::from_value(value).unwrap()
}

fn values(rows: &[Row], field: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r.get(field).map(data_model::display_value).unwrap_or_default())
        .collect()
}

fn column(field: &str, items: &[&str]) -> Vec<Row> {
    items.iter().map(|v| row(json!({ field: v }))).collect()
}

#[test]
fn test_currency_values_sort_numerically() {
    let mut rows = vec![
        row(json!({"id": "A", "name": "Apple", "gross": "£10.00"})),
        row(json!({"id": "B", "name": "Banana", "gross": "£2.50", "isLocked": true})),
    ];
    sort::sort_rows(&mut rows, "gross", SortOrder::Asc);
    assert_eq!(values(&rows, "id"), vec!["B", "A"]);
}

#[test]
fn test_date_descending() {
    let mut rows = vec![
        row(json!({"invoiceNo": "INV-2", "date": "2024-01-05"})),
        row(json!({"invoiceNo": "INV-1", "date": "2024-01-20"})),
    ];
    sort::sort_rows(&mut rows, "date", SortOrder::Desc);
    assert_eq!(values(&rows, "invoiceNo"), vec!["INV-1", "INV-2"]);
}

#[test]
fn test_unparseable_dates_sort_after_valid_ones() {
    let mut rows = column("date", &["2024-03-01", "soon", "2023-12-31T10:00:00Z", "01/15/2024"]);
    sort::sort_rows(&mut rows, "date", SortOrder::Asc);
    assert_eq!(
        values(&rows, "date"),
        vec!["2023-12-31T10:00:00Z", "01/15/2024", "2024-03-01", "soon"]
    );

    sort::sort_rows(&mut rows, "date", SortOrder::Desc);
    assert_eq!(values(&rows, "date")[0], "soon");
}

#[test]
fn test_missing_date_counts_as_invalid() {
    let mut rows = vec![row(json!({"n": 1})), row(json!({"n": 2, "date": "2024-01-01"}))];
    sort::sort_rows(&mut rows, "date", SortOrder::Asc);
    assert_eq!(values(&rows, "n"), vec!["2", "1"]);
}

#[test]
fn test_ascending_then_descending_is_reversed() {
    let mut rows = column("qty", &["3 units", "12 units", "1 unit", "7 units"]);
    sort::sort_rows(&mut rows, "qty", SortOrder::Asc);
    let ascending = values(&rows, "qty");
    assert_eq!(ascending, vec!["1 unit", "3 units", "7 units", "12 units"]);

    sort::sort_rows(&mut rows, "qty", SortOrder::Desc);
    let mut descending = values(&rows, "qty");
    descending.reverse();
    assert_eq!(descending, ascending);
}

#[test]
fn test_sorting_twice_is_idempotent() {
    let mut rows = column("gross", &["£5", "£1.5", "£20", "£0.99"]);
    sort::sort_rows(&mut rows, "gross", SortOrder::Asc);
    let once = rows.clone();
    sort::sort_rows(&mut rows, "gross", SortOrder::Asc);
    assert_eq!(rows, once);
}

#[test]
fn test_plain_strings_sort_case_insensitively() {
    let mut rows = column("name", &["banana", "Cherry", "apple"]);
    sort::sort_rows(&mut rows, "name", SortOrder::Asc);
    assert_eq!(values(&rows, "name"), vec!["apple", "banana", "Cherry"]);
}

#[test]
fn test_accented_names_sort_with_their_base_letters() {
    let mut rows = column("name", &["Zucchini", "Éclair", "eggs", "apple", "Crème", "Jalapeño", "jam"]);
    sort::sort_rows(&mut rows, "name", SortOrder::Asc);
    assert_eq!(
        values(&rows, "name"),
        vec!["apple", "Crème", "Éclair", "eggs", "Jalapeño", "jam", "Zucchini"]
    );
}

#[test]
fn test_collation_key_folds_case_and_accents() {
    assert_eq!(sort::collation_key("Éclair"), "eclair");
    assert_eq!(sort::collation_key("JALAPEÑO"), "jalapeno");
}

#[test]
fn test_mixed_column_has_a_stable_total_order() {
    let items = ["x9", "m", "a10", "Pear", "2"];
    let mut first = column("code", &items);
    sort::sort_rows(&mut first, "code", SortOrder::Asc);

    let mut reversed: Vec<&str> = items.to_vec();
    reversed.reverse();
    let mut second = column("code", &reversed);
    sort::sort_rows(&mut second, "code", SortOrder::Asc);

    assert_eq!(values(&first, "code"), values(&second, "code"));
    assert_eq!(values(&first, "code"), vec!["2", "x9", "a10", "m", "Pear"]);
}

#[test]
fn test_compare_field_matches_sort_direction() {
    let cheap = row(json!({"gross": "£2.50"}));
    let dear = row(json!({"gross": "£10.00"}));
    assert_eq!(sort::compare_field("gross", &cheap, &dear), Ordering::Less);
    assert_eq!(sort::compare_field("gross", &dear, &cheap), Ordering::Greater);
}

#[test]
fn test_numeric_token_extraction() {
    assert_eq!(sort::numeric_token("£10.00"), Some(10.0));
    assert_eq!(sort::numeric_token("-3 items"), Some(-3.0));
    assert_eq!(sort::numeric_token("£-5.00"), Some(-5.0));
    assert_eq!(sort::numeric_token("INV-12"), Some(12.0));
    assert_eq!(sort::numeric_token("1,250.50"), Some(1250.5));
    assert_eq!(sort::numeric_token(".5kg"), Some(0.5));
    assert_eq!(sort::numeric_token("none"), None);
}

#[test]
fn test_sort_state_toggling() {
    let mut state = SortState::default();
    assert_eq!(state.apply("gross", None), SortSpec::new("gross", SortOrder::Asc));
    assert_eq!(state.apply("gross", None), SortSpec::new("gross", SortOrder::Desc));
    assert_eq!(state.apply("gross", None), SortSpec::new("gross", SortOrder::Asc));
    assert_eq!(state.apply("name", None), SortSpec::new("name", SortOrder::Asc));
    assert_eq!(
        state.apply("date", Some(SortOrder::Desc)),
        SortSpec::new("date", SortOrder::Desc)
    );
    assert_eq!(state.spec(), Some(SortSpec::new("date", SortOrder::Desc)));
}

#[test]
fn test_default_sort_runs_once_per_version() {
    let default = SortSpec::new("date", SortOrder::Desc);
    assert_eq!(sort::default_sort_for(1, None, Some(&default)), Some(default.clone()));
    assert_eq!(sort::default_sort_for(1, Some(1), Some(&default)), None);
    assert_eq!(sort::default_sort_for(2, Some(1), Some(&default)), Some(default.clone()));
    assert_eq!(sort::default_sort_for(2, None, None), None);
}

#[test]
fn test_empty_rows_sort_is_a_no_op() {
    let mut rows: Vec<Row> = Vec::new();
    sort::sort_rows(&mut rows, "gross", SortOrder::Desc);
    assert!(rows.is_empty());
}
