//! Batched, history-tracked sheet edits.
//!
//! `DslEditor` holds no state of its own between calls. Every `update_dsl`
//! call hands the whole batch to the sheet-content updater in one go and,
//! only if the updater accepts it, records history grouped by title.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Line terminator appended to every sheet written through the editor.
pub const NEW_LINE: &str = "\r\n";

/// Append `NEW_LINE` unless the content already ends with it.
pub fn terminate(content: &str) -> String {
    if content.ends_with(NEW_LINE) {
        content.to_string()
    } else {
        format!("{}{}", content, NEW_LINE)
    }
}

/// New content for one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetChange {
    pub sheet_name: String,
    pub content: String,
}

/// Changes recorded under one history title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub title: String,
    pub changes: Vec<SheetChange>,
}

/// One requested edit. An empty `history_title` means "do not record".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslEdit {
    pub updated_sheet_content: String,
    pub history_title: String,
    /// Target sheet. `None` targets the editor's current sheet.
    pub sheet_name_to_change: Option<String>,
}

impl DslEdit {
    pub fn new(updated_sheet_content: impl Into<String>, history_title: impl Into<String>) -> Self {
        Self {
            updated_sheet_content: updated_sheet_content.into(),
            history_title: history_title.into(),
            sheet_name_to_change: None,
        }
    }

    pub fn for_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name_to_change = Some(sheet_name.into());
        self
    }
}

/// Ordered edits forming one logical operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<DslEdit>,
}

impl EditBatch {
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl From<DslEdit> for EditBatch {
    fn from(edit: DslEdit) -> Self {
        Self { edits: vec![edit] }
    }
}

impl From<Vec<DslEdit>> for EditBatch {
    fn from(edits: Vec<DslEdit>) -> Self {
        Self { edits }
    }
}

/// Persists sheet contents. Resolves to `false` when the write failed.
pub trait SheetContentUpdater {
    fn update_sheet_content(&self, changes: Vec<SheetChange>) -> impl Future<Output = bool>;
}

/// Receives one call per history title after a successful write.
pub trait HistoryAppender {
    fn append_to(&self, title: &str, changes: &[SheetChange]);
}

impl<F> HistoryAppender for F
where
    F: Fn(&str, &[SheetChange]),
{
    fn append_to(&self, title: &str, changes: &[SheetChange]) {
        self(title, changes)
    }
}

/// Group titled changes by title in first-seen order. Empty titles are dropped.
pub fn group_history(changes: &[(String, SheetChange)]) -> Vec<HistoryRecord> {
    let mut records: Vec<HistoryRecord> = Vec::new();
    for (title, change) in changes {
        if title.is_empty() {
            continue;
        }
        match records.iter_mut().find(|r| &r.title == title) {
            Some(record) => record.changes.push(change.clone()),
            None => records.push(HistoryRecord {
                title: title.clone(),
                changes: vec![change.clone()],
            }),
        }
    }
    records
}

pub struct DslEditor<U, H> {
    sheet_name: String,
    updater: U,
    history: H,
}

impl<U, H> DslEditor<U, H>
where
    U: SheetContentUpdater,
    H: HistoryAppender,
{
    pub fn new(sheet_name: impl Into<String>, updater: U, history: H) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            updater,
            history,
        }
    }

    /// Sheet targeted by edits that do not name one.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn set_sheet_name(&mut self, sheet_name: impl Into<String>) {
        self.sheet_name = sheet_name.into();
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Apply one edit or a batch. All-or-nothing with respect to history:
    /// a rejected write records nothing for the whole batch.
    pub async fn update_dsl(&self, edits: impl Into<EditBatch>) -> Result<(), EditError> {
        let batch = edits.into();
        if batch.is_empty() {
            log::debug!("DSL edit batch is empty, nothing to apply");
            return Ok(());
        }

        let titled: Vec<(String, SheetChange)> = batch
            .edits
            .into_iter()
            .map(|edit| {
                let sheet_name = edit
                    .sheet_name_to_change
                    .unwrap_or_else(|| self.sheet_name.clone());
                let change = SheetChange {
                    sheet_name,
                    content: terminate(&edit.updated_sheet_content),
                };
                (edit.history_title, change)
            })
            .collect();

        let changes: Vec<SheetChange> = titled.iter().map(|(_, c)| c.clone()).collect();
        log::debug!("Updating {} sheet(s)", changes.len());

        if !self.updater.update_sheet_content(changes).await {
            let sheets: Vec<String> = titled.into_iter().map(|(_, c)| c.sheet_name).collect();
            log::warn!("Sheet update rejected, history not recorded ({})", sheets.join(", "));
            return Err(EditError::UpdateRejected { sheets });
        }

        for record in group_history(&titled) {
            self.history.append_to(&record.title, &record.changes);
        }
        Ok(())
    }
}
