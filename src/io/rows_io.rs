use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::state::data_model::{self, Row, RowGroup};

#[derive(Debug)]
pub enum RowsIoError {
    Read(io::Error),
    Json(serde_json::Error),
    NotAnArray,
    NotAnObject { index: usize },
    // A grouped file mixes in an item without a `rows` array.
    NotGroup { index: usize },
}

impl fmt::Display for RowsIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "cannot read rows: {err}"),
            Self::Json(err) => write!(f, "malformed rows: {err}"),
            Self::NotAnArray => f.write_str("rows must be a JSON array"),
            Self::NotAnObject { index } => write!(f, "item {index} is not a row object"),
            Self::NotGroup { index } => {
                write!(f, "item {index} has no `rows` array but item 0 is a group")
            }
        }
    }
}

impl std::error::Error for RowsIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RowsIoError {
    fn from(err: io::Error) -> Self {
        Self::Read(err)
    }
}

impl From<serde_json::Error> for RowsIoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub fn load_rows(path: &Path) -> Result<Vec<RowGroup>, RowsIoError> {
    let content = fs::read_to_string(path)?;
    parse_rows(&content)
}

// Parses a JSON array of rows, or of `{ "category", "rows" }` groups. The
// first item decides which; a plain row list becomes one unnamed group.
pub fn parse_rows(content: &str) -> Result<Vec<RowGroup>, RowsIoError> {
    let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
        return Err(RowsIoError::NotAnArray);
    };
    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(RowsIoError::NotAnObject { index });
    }

    if items.first().is_some_and(is_group) {
        if let Some(index) = items.iter().position(|item| !is_group(item)) {
            return Err(RowsIoError::NotGroup { index });
        }
        let groups: Vec<RowGroup> = serde_json::from_value(Value::Array(items))?;
        debug!(groups = groups.len(), "loaded grouped rows");
        return Ok(groups);
    }

    let rows: Vec<Row> = serde_json::from_value(Value::Array(items))?;
    debug!(rows = rows.len(), "loaded rows");
    Ok(data_model::ungrouped(rows))
}

fn is_group(item: &Value) -> bool {
    item.get("rows").is_some_and(Value::is_array)
}
