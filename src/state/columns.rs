use crate::state::data_model::{self, Column, Row};

// Keeps the configured columns that have at least one non-blank value in
// `rows`. With no rows there is nothing to disprove, so every column stays.
pub fn resolve_visible<'a, I>(columns: &[Column], rows: I) -> Vec<Column>
where
    I: IntoIterator<Item = &'a Row>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();
    if rows.clone().next().is_none() {
        return columns.to_vec();
    }

    columns
        .iter()
        .filter(|column| {
            rows.clone()
                .any(|row| !data_model::is_blank(row.get(&column.field)))
        })
        .cloned()
        .collect()
}

impl Column {
    pub fn truncate(&self, text: &str) -> String {
        match self.max_chars {
            Some(max) if text.chars().count() > max => {
                let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
                out.push('…');
                out
            }
            _ => text.to_string(),
        }
    }
}
