use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::data_model::Column;
use crate::state::filter::DEFAULT_SEARCH_FIELDS;
use crate::state::row_identity::DEFAULT_IDENTITY_FIELDS;
use crate::state::sort::SortSpec;

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

// Per-table settings. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub columns: Vec<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,
    pub search_fields: Vec<String>,
    pub identity_fields: Vec<String>,
    pub search_debounce_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_placeholder: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            default_sort: None,
            search_fields: DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            identity_fields: DEFAULT_IDENTITY_FIELDS.iter().map(|f| f.to_string()).collect(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            search_placeholder: None,
            labels: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn with_default_sort(mut self, default_sort: SortSpec) -> Self {
        self.default_sort = Some(default_sort);
        self
    }

    pub fn with_search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}
