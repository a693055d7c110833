use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::state::claims::{ClaimDraft, ClaimError};
use crate::state::config::TableConfig;
use crate::state::data_model::{ClaimRecord, Column, Row, RowGroup, RowId};
use crate::state::selection::SelectionChange;
use crate::state::sort::{SortOrder, SortSpec};
use crate::state::table_engine::{DataSet, TableEngine, TableEvent};

type RowSelectFn = Box<dyn FnMut(&SelectionChange)>;
type SortFn = Box<dyn FnMut(&str, SortOrder)>;
type ClearSearchFn = Box<dyn FnMut()>;
type InvoiceClickFn = Box<dyn FnMut(&Row, &str)>;

#[derive(Default)]
pub struct TableCallbacks {
    on_row_select: Option<RowSelectFn>,
    on_sort: Option<SortFn>,
    on_clear_search: Option<ClearSearchFn>,
    on_invoice_click: Option<InvoiceClickFn>,
}

impl TableCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_row_select(mut self, f: impl FnMut(&SelectionChange) + 'static) -> Self {
        self.on_row_select = Some(Box::new(f));
        self
    }

    pub fn on_sort(mut self, f: impl FnMut(&str, SortOrder) + 'static) -> Self {
        self.on_sort = Some(Box::new(f));
        self
    }

    pub fn on_clear_search(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_clear_search = Some(Box::new(f));
        self
    }

    pub fn on_invoice_click(mut self, f: impl FnMut(&Row, &str) + 'static) -> Self {
        self.on_invoice_click = Some(Box::new(f));
        self
    }

    fn fire(&mut self, event: &TableEvent) {
        match event {
            TableEvent::RowsSelected(change) => {
                if let Some(f) = self.on_row_select.as_mut() {
                    f(change);
                }
            }
            TableEvent::Sorted(spec) => {
                if let Some(f) = self.on_sort.as_mut() {
                    f(&spec.field, spec.order);
                }
            }
            TableEvent::SearchCleared => {
                if let Some(f) = self.on_clear_search.as_mut() {
                    f();
                }
            }
            TableEvent::InvoiceClicked { row, value } => {
                if let Some(f) = self.on_invoice_click.as_mut() {
                    f(row, value);
                }
            }
        }
    }
}

impl fmt::Debug for TableCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCallbacks")
            .field("on_row_select", &self.on_row_select.is_some())
            .field("on_sort", &self.on_sort.is_some())
            .field("on_clear_search", &self.on_clear_search.is_some())
            .field("on_invoice_click", &self.on_invoice_click.is_some())
            .finish()
    }
}

struct Shared {
    engine: RefCell<TableEngine>,
    callbacks: RefCell<TableCallbacks>,
    queue: RefCell<VecDeque<TableEvent>>,
    dispatching: Cell<bool>,
}

impl Shared {
    fn run<R>(&self, op: impl FnOnce(&mut TableEngine) -> R) -> R {
        let (result, events) = {
            let mut engine = self.engine.borrow_mut();
            let result = op(&mut engine);
            (result, engine.take_events())
        };
        self.dispatch(events);
        result
    }

    // Callbacks may call back into the table; events raised meanwhile are
    // queued and delivered by the outermost dispatch, in order.
    fn dispatch(&self, events: Vec<TableEvent>) {
        self.queue.borrow_mut().extend(events);
        if self.dispatching.replace(true) {
            return;
        }
        let _reset = DispatchReset(&self.dispatching);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.callbacks.borrow_mut().fire(&event);
        }
    }
}

// Clears the dispatching flag even when a callback unwinds.
struct DispatchReset<'a>(&'a Cell<bool>);

impl Drop for DispatchReset<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct Table {
    shared: Rc<Shared>,
    controller: TableController,
}

impl Table {
    pub fn new(config: TableConfig, callbacks: TableCallbacks) -> Self {
        let shared = Rc::new(Shared {
            engine: RefCell::new(TableEngine::new(config)),
            callbacks: RefCell::new(callbacks),
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        });
        let controller = TableController {
            shared: Rc::downgrade(&shared),
        };
        Self { shared, controller }
    }

    // Every call hands out the same underlying handle.
    pub fn controller(&self) -> TableController {
        self.controller.clone()
    }

    pub fn with_engine<R>(&self, f: impl FnOnce(&TableEngine) -> R) -> R {
        f(&*self.shared.engine.borrow())
    }

    pub fn set_data(&self, data: DataSet) -> bool {
        self.shared.run(|engine| engine.set_data(data))
    }

    pub fn replace_rows(&self, rows: Vec<Row>) -> bool {
        self.shared.run(|engine| engine.replace_rows(rows))
    }

    pub fn replace_groups(&self, groups: Vec<RowGroup>) -> bool {
        self.shared.run(|engine| engine.replace_groups(groups))
    }

    pub fn set_columns(&self, columns: Vec<Column>) {
        self.shared.run(|engine| engine.set_columns(columns))
    }

    pub fn sort_by(&self, field: &str) -> SortSpec {
        self.shared.run(|engine| engine.sort_by(field))
    }

    pub fn set_query(&self, query: &str) -> bool {
        self.shared.run(|engine| engine.set_query(query))
    }

    pub fn clear_search(&self) {
        self.shared.run(|engine| engine.clear_search())
    }

    pub fn toggle(&self, id: &RowId) -> bool {
        self.shared.run(|engine| engine.toggle(id))
    }

    pub fn select_all(&self) -> bool {
        self.shared.run(|engine| engine.select_all())
    }

    pub fn clear_selection(&self) -> bool {
        self.shared.run(|engine| engine.clear_selection())
    }

    pub fn submit_claim(&self, id: &RowId, draft: ClaimDraft) -> Result<ClaimRecord, ClaimError> {
        self.shared.run(|engine| engine.submit_claim(id, draft))
    }

    pub fn set_hovered(&self, id: Option<RowId>) -> bool {
        self.shared.run(|engine| engine.set_hovered(id))
    }

    pub fn click_cell(&self, id: &RowId, field: &str) -> bool {
        self.shared.run(|engine| engine.click_cell(id, field))
    }

    pub fn visible_rows(&self) -> Vec<Row> {
        self.with_engine(TableEngine::visible_rows)
    }

    pub fn visible_groups(&self) -> Vec<RowGroup> {
        self.with_engine(TableEngine::visible_groups)
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        self.with_engine(|engine| engine.visible_columns().to_vec())
    }

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.with_engine(TableEngine::selected_ids)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("engine", &self.shared.engine.borrow())
            .field("callbacks", &self.shared.callbacks.borrow())
            .finish()
    }
}

/// Long-lived handle for a parent that owns the table but does not re-render
/// it on selection changes. It does not keep the table alive: once the
/// `Table` is dropped every call is a no-op.
#[derive(Clone)]
pub struct TableController {
    shared: Weak<Shared>,
}

impl TableController {
    pub fn has_selection(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.engine.borrow().has_selection())
    }

    pub fn clear_selection(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.run(|engine| engine.clear_selection());
        }
    }

    pub fn select_all(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.run(|engine| engine.select_all());
        }
    }

    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }

    pub fn same_table(&self, other: &TableController) -> bool {
        Weak::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("attached", &self.is_attached())
            .finish()
    }
}
