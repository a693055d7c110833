use std::collections::BTreeSet;

use tracing::trace;

use crate::state::data_model::{Row, RowId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStatus {
    Empty,
    Partial,
    All,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct SelectionChange {
    pub has_selection: bool,
    pub rows: Vec<Row>,
}

impl SelectionChange {
    pub fn cleared() -> Self {
        Self::default()
    }
}

// Set of selected row ids. It never decides selectability itself: callers
// resolve the row first and pass `None` for ids that are not in the current
// data set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: BTreeSet<RowId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<RowId> {
        &self.selected
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn toggle(&mut self, id: &RowId, selectable: Option<bool>) -> bool {
        match selectable {
            Some(true) => {
                if !self.selected.remove(id) {
                    self.selected.insert(id.clone());
                }
                true
            }
            Some(false) => {
                trace!(%id, "ignoring toggle of unselectable row");
                false
            }
            None => {
                trace!(%id, "ignoring toggle of unknown row");
                false
            }
        }
    }

    pub fn select_all<I>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = RowId>,
    {
        let candidates: BTreeSet<RowId> = candidates.into_iter().collect();
        if candidates.is_empty() {
            return false;
        }

        if candidates.is_subset(&self.selected) {
            trace!(count = candidates.len(), "select all: deselecting");
            self.selected.retain(|id| !candidates.contains(id));
        } else {
            trace!(count = candidates.len(), "select all: selecting");
            self.selected.extend(candidates);
        }
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&RowId) -> bool,
    {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        self.selected.len() != before
    }

    pub fn is_all_selected<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        let mut seen = false;
        for id in candidates {
            if !self.selected.contains(id) {
                return false;
            }
            seen = true;
        }
        seen
    }

    pub fn status<'a, I>(&self, candidates: I) -> SelectionStatus
    where
        I: IntoIterator<Item = &'a RowId>,
    {
        if self.selected.is_empty() {
            SelectionStatus::Empty
        } else if self.is_all_selected(candidates) {
            SelectionStatus::All
        } else {
            SelectionStatus::Partial
        }
    }
}
