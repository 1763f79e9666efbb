//! Located tables and fields.
//!
//! Everything here is a view over one sheet text: spans are byte offsets into
//! the text the value was parsed from and are meaningless for any other text.

use serde::Serialize;

/// Byte range `[start, end)` into sheet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// `!name(args)` annotation attached to the table or field that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decorator {
    pub name: String,
    /// Raw text between the parentheses, if any.
    pub args: Option<String>,
    pub span: Span,
}

/// Identifies a field within a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldKey {
    pub table_name: String,
    pub field_name: String,
    /// Bracketed form, e.g. `[f2]`.
    pub full_field_name: String,
}

impl FieldKey {
    pub fn new(table_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        Self {
            table_name: table_name.into(),
            full_field_name: format!("[{}]", field_name),
            field_name,
        }
    }
}

/// A field declaration located in sheet text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRef {
    pub key: FieldKey,
    pub is_key: bool,
    pub is_dim: bool,
    pub decorators: Vec<Decorator>,
    /// Expression after `=`, trimmed. `None` when the field has no `=`.
    pub expression: Option<String>,
    /// Whole declaration: leading decorators/modifiers through the expression.
    pub span: Span,
    /// The bracketed name, brackets included.
    pub name_span: Span,
    pub expression_span: Option<Span>,
}

/// A table declaration located in sheet text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    /// Name exactly as written, quotes included for quoted names.
    pub table_name: String,
    pub decorators: Vec<Decorator>,
    /// From the first decorator (or `table` keyword) to the end of the last
    /// item belonging to the table.
    pub span: Span,
    pub name_span: Span,
    /// Fields in declaration order.
    pub fields: Vec<FieldRef>,
    /// Entries of the `total` section. Not fields.
    pub totals: Vec<FieldRef>,
    pub override_span: Option<Span>,
    pub apply_span: Option<Span>,
}

impl TableRef {
    pub fn field(&self, field_name: &str) -> Option<&FieldRef> {
        self.fields.iter().find(|f| f.key.field_name == field_name)
    }

    pub fn last_field(&self) -> Option<&FieldRef> {
        self.fields.last()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.field_name.as_str()).collect()
    }

    pub fn has_override(&self) -> bool {
        self.override_span.is_some()
    }
}

/// Non-fatal problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub offset: usize,
    pub message: String,
}

/// Every table of one sheet text, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSheet {
    pub tables: Vec<TableRef>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedSheet {
    /// First table whose declared name matches exactly.
    pub fn table(&self, table_name: &str) -> Option<&TableRef> {
        self.tables.iter().find(|t| t.table_name == table_name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table_name.as_str()).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
