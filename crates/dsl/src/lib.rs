//! `quantgrid-dsl`: sheet DSL lookup and editing.
//!
//! Pure text in, structured results out. Persistence and undo history are
//! external collaborators reached through `SheetContentUpdater` and
//! `HistoryAppender`.

pub mod edit;
pub mod editor;
pub mod error;
pub mod locator;
pub mod model;
pub mod parser;

pub use edit::{append_field, remove_field, rename_table, set_field_expression};
pub use editor::{
    group_history, terminate, DslEdit, DslEditor, EditBatch, HistoryAppender, HistoryRecord,
    SheetChange, SheetContentUpdater, NEW_LINE,
};
pub use error::EditError;
pub use locator::{find_last_table_field, find_table, find_table_field};
pub use model::{Decorator, FieldKey, FieldRef, ParseDiagnostic, ParsedSheet, Span, TableRef};
pub use parser::parse_sheet;
