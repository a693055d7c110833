use crate::state::data_model::{self, Row, RowGroup};

pub const DEFAULT_SEARCH_FIELDS: [&str; 3] = ["name", "code", "description"];

pub fn filter_groups(groups: &[RowGroup], query: &str, search_fields: &[String]) -> Vec<RowGroup> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return groups.to_vec();
    }

    groups
        .iter()
        .filter_map(|group| {
            let rows: Vec<Row> = group
                .rows
                .iter()
                .filter(|row| matches_needle(row, &needle, search_fields))
                .cloned()
                .collect();
            (!rows.is_empty()).then(|| RowGroup::new(group.category.clone(), rows))
        })
        .collect()
}

pub fn row_matches(row: &Row, query: &str, search_fields: &[String]) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || matches_needle(row, &needle, search_fields)
}

fn matches_needle(row: &Row, needle: &str, search_fields: &[String]) -> bool {
    search_fields.iter().any(|field| {
        let value = row.get(field);
        !data_model::is_blank(value)
            && value
                .map(|value| data_model::display_value(value).to_lowercase().contains(needle))
                .unwrap_or(false)
    })
}
