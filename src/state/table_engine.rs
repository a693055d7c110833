use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::state::claims::{self, ClaimDraft, ClaimError};
use crate::state::columns;
use crate::state::config::TableConfig;
use crate::state::data_model::{self, ClaimRecord, Column, Row, RowGroup, RowId};
use crate::state::filter;
use crate::state::row_identity::RowIdentity;
use crate::state::selection::{SelectionChange, SelectionManager, SelectionStatus};
use crate::state::sort::{self, SortOrder, SortSpec, SortState};

pub type DataSet = Arc<Vec<RowGroup>>;

#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    RowsSelected(SelectionChange),
    Sorted(SortSpec),
    SearchCleared,
    InvoiceClicked { row: Row, value: String },
}

#[derive(Clone, Debug)]
pub struct TableEngine {
    columns: Vec<Column>,
    visible_columns: Vec<Column>,
    search_fields: Vec<String>,
    identity: RowIdentity,
    default_sort: Option<SortSpec>,
    data: DataSet,
    version: u64,
    // Selectability per id in the current data set, claims included.
    index: BTreeMap<RowId, bool>,
    claims: BTreeMap<RowId, ClaimRecord>,
    sort: SortState,
    default_sort_version: Option<u64>,
    query: String,
    selection: SelectionManager,
    hovered: Option<RowId>,
    events: Vec<TableEvent>,
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl TableEngine {
    pub fn new(config: TableConfig) -> Self {
        let TableConfig {
            columns,
            default_sort,
            search_fields,
            identity_fields,
            ..
        } = config;

        Self {
            visible_columns: columns.clone(),
            columns,
            search_fields,
            identity: RowIdentity::new(identity_fields),
            default_sort,
            data: Arc::new(Vec::new()),
            version: 0,
            index: BTreeMap::new(),
            claims: BTreeMap::new(),
            sort: SortState::default(),
            default_sort_version: None,
            query: String::new(),
            selection: SelectionManager::new(),
            hovered: None,
            events: Vec::new(),
        }
    }

    pub fn from_rows(config: TableConfig, rows: Vec<Row>) -> Self {
        let mut engine = Self::new(config);
        engine.replace_rows(rows);
        engine.events.clear();
        engine
    }

    pub fn from_groups(config: TableConfig, groups: Vec<RowGroup>) -> Self {
        let mut engine = Self::new(config);
        engine.replace_groups(groups);
        engine.events.clear();
        engine
    }


    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    // Installs `data` unless it is the data set already held. A new data set
    // always empties the selection and gets the default sort once.
    pub fn set_data(&mut self, data: DataSet) -> bool {
        if Arc::ptr_eq(&self.data, &data) {
            return false;
        }

        self.data = data;
        self.version += 1;
        self.claims.clear();
        self.hovered = None;
        self.rebuild_index();
        self.visible_columns =
            columns::resolve_visible(&self.columns, data_model::flatten(&self.data));
        debug!(
            version = self.version,
            ids = self.index.len(),
            "data set replaced"
        );

        self.selection.clear();
        self.events
            .push(TableEvent::RowsSelected(SelectionChange::cleared()));

        if let Some(spec) = sort::default_sort_for(
            self.version,
            self.default_sort_version,
            self.default_sort.as_ref(),
        ) {
            debug!(field = %spec.field, order = spec.order.as_str(), "applying default sort");
            self.default_sort_version = Some(self.version);
            let applied = self.sort.apply(&spec.field, Some(spec.order));
            self.events.push(TableEvent::Sorted(applied));
        }
        true
    }

    pub fn replace_rows(&mut self, rows: Vec<Row>) -> bool {
        self.set_data(Arc::new(data_model::ungrouped(rows)))
    }

    pub fn replace_groups(&mut self, groups: Vec<RowGroup>) -> bool {
        self.set_data(Arc::new(groups))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for row in data_model::flatten(&self.data) {
            let id = self.identity.identify(row);
            let selectable = row.is_selectable();
            self.index
                .entry(id)
                .and_modify(|current| *current &= selectable)
                .or_insert(selectable);
        }
    }

    pub fn identify(&self, row: &Row) -> RowId {
        self.identity.identify(row)
    }

    pub fn row(&self, id: &RowId) -> Option<Row> {
        data_model::flatten(&self.data)
            .find(|row| &self.identity.identify(row) == id)
            .map(|row| self.row_view(id, row).into_owned())
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_selectable(&self, id: &RowId) -> Option<bool> {
        self.index.get(id).copied()
    }

    fn row_view<'a>(&self, id: &RowId, row: &'a Row) -> Cow<'a, Row> {
        match self.claims.get(id) {
            Some(claim) => Cow::Owned(row.with_claim(claim.clone())),
            None => Cow::Borrowed(row),
        }
    }

    fn merged_groups(&self) -> Cow<'_, [RowGroup]> {
        if self.claims.is_empty() {
            return Cow::Borrowed(self.data.as_slice());
        }
        Cow::Owned(
            self.data
                .iter()
                .map(|group| {
                    let rows = group
                        .rows
                        .iter()
                        .map(|row| self.row_view(&self.identity.identify(row), row).into_owned())
                        .collect();
                    RowGroup::new(group.category.clone(), rows)
                })
                .collect(),
        )
    }


    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn visible_columns(&self) -> &[Column] {
        &self.visible_columns
    }

    pub fn set_columns(&mut self, configured: Vec<Column>) {
        self.visible_columns =
            columns::resolve_visible(&configured, data_model::flatten(&self.data));
        self.columns = configured;
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.field == field)
    }


    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_by(&mut self, field: &str) -> SortSpec {
        self.apply_sort(field, None)
    }

    pub fn sort_by_order(&mut self, field: &str, order: SortOrder) -> SortSpec {
        self.apply_sort(field, Some(order))
    }

    fn apply_sort(&mut self, field: &str, order: Option<SortOrder>) -> SortSpec {
        let spec = self.sort.apply(field, order);
        trace!(field, order = spec.order.as_str(), "sort applied");
        self.events.push(TableEvent::Sorted(spec.clone()));
        spec
    }


    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        true
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.events.push(TableEvent::SearchCleared);
    }

    pub fn visible_groups(&self) -> Vec<RowGroup> {
        filter::filter_groups(&self.merged_groups(), &self.query, &self.search_fields)
    }

    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = self.visible_groups().into_iter().flat_map(|g| g.rows).collect();
        if let Some(field) = self.sort.field.as_deref() {
            sort::sort_rows(&mut rows, field, self.sort.order);
        }
        rows
    }

    fn visible_selectable_ids(&self) -> Vec<RowId> {
        data_model::flatten(&self.data)
            .filter(|row| filter::row_matches(row, &self.query, &self.search_fields))
            .map(|row| self.identity.identify(row))
            .filter(|id| self.is_selectable(id) == Some(true))
            .collect()
    }


    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selection.selected().iter().cloned().collect()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn selected_rows(&self) -> Vec<Row> {
        data_model::flatten(&self.data)
            .filter_map(|row| {
                let id = self.identity.identify(row);
                self.selection
                    .contains(&id)
                    .then(|| self.row_view(&id, row).into_owned())
            })
            .collect()
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.contains(id)
    }

    pub fn toggle(&mut self, id: &RowId) -> bool {
        let changed = self.selection.toggle(id, self.is_selectable(id));
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let candidates = self.visible_selectable_ids();
        let changed = self.selection.select_all(candidates);
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection
            .is_all_selected(&self.visible_selectable_ids())
    }

    pub fn selection_status(&self) -> SelectionStatus {
        self.selection.status(&self.visible_selectable_ids())
    }

    fn notify_selection(&mut self) {
        let change = SelectionChange {
            has_selection: self.selection.has_selection(),
            rows: self.selected_rows(),
        };
        self.events.push(TableEvent::RowsSelected(change));
    }


    pub fn claim(&self, id: &RowId) -> Option<&ClaimRecord> {
        self.claims.get(id)
    }

    pub fn submit_claim(&mut self, id: &RowId, draft: ClaimDraft) -> Result<ClaimRecord, ClaimError> {
        let row = self
            .row(id)
            .ok_or_else(|| ClaimError::UnknownRow(id.clone()))?;
        let claim = draft.submit(id, &row)?;
        self.attach_claim(id, claim.clone())?;
        Ok(claim)
    }

    pub fn attach_claim(&mut self, id: &RowId, claim: ClaimRecord) -> Result<(), ClaimError> {
        let row = self
            .row(id)
            .ok_or_else(|| ClaimError::UnknownRow(id.clone()))?;
        claims::check_claimable(id, &row)?;

        debug!(%id, reason = %claim.reason, "claim attached");
        self.claims.insert(id.clone(), claim);
        self.index.insert(id.clone(), false);
        if self.selection.retain(|selected| selected != id) {
            self.notify_selection();
        }
        Ok(())
    }


    pub fn hovered(&self) -> Option<&RowId> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, id: Option<RowId>) -> bool {
        if id.as_ref().is_some_and(|id| !self.contains(id)) || self.hovered == id {
            return false;
        }
        self.hovered = id;
        true
    }

    pub fn click_cell(&mut self, id: &RowId, field: &str) -> bool {
        let is_link = self.column(field).is_some_and(|column| column.link);
        if !is_link {
            return false;
        }
        let Some(row) = self.row(id) else {
            return false;
        };
        let value = row
            .get(field)
            .map(data_model::display_value)
            .unwrap_or_default();
        self.events.push(TableEvent::InvoiceClicked { row, value });
        true
    }


    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }
}
