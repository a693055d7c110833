pub mod io;
pub mod state;

pub use state::config::TableConfig;
pub use state::controller::{Table, TableCallbacks, TableController};
pub use state::data_model::{ClaimRecord, Column, Row, RowGroup, RowId};
pub use state::selection::{SelectionChange, SelectionStatus};
pub use state::sort::{SortOrder, SortSpec};
pub use state::table_engine::{TableEngine, TableEvent};
