use serde_json::Value;

use crate::state::data_model::{self, Row, RowId};

pub const DEFAULT_IDENTITY_FIELDS: [&str; 2] = ["invoiceNo", "id"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowIdentity {
    fields: Vec<String>,
}

impl Default for RowIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

impl RowIdentity {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn identify(&self, row: &Row) -> RowId {
        self.fields
            .iter()
            .find_map(|field| match row.get(field) {
                None | Some(Value::Null) => None,
                Some(value) => Some(RowId::new(data_model::display_value(value))),
            })
            .unwrap_or_else(|| content_key(row))
    }
}

pub fn identify(row: &Row) -> RowId {
    RowIdentity::default().identify(row)
}

// Fields live in a BTreeMap, so the serialization is key-ordered and stable.
// Control attributes are left out so attaching a claim keeps the key.
fn content_key(row: &Row) -> RowId {
    RowId::new(Value::Object(row.fields.clone().into_iter().collect()).to_string())
}

