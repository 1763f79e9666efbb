// Text transforms built on the locator
// Each returns the edited sheet text, or None when the table/field is absent.
// The result is meant to be passed on as `DslEdit::updated_sheet_content`.

use crate::model::{FieldKey, Span};
use crate::parser::parse_sheet;

const DEFAULT_INDENT: &str = "  ";

/// Line break used by the line holding `at`: its own break, or the break of
/// the line before it when it is the last line.
fn line_break_at(text: &str, at: usize) -> &'static str {
    let bytes = text.as_bytes();
    let newline = text[at..]
        .find('\n')
        .map(|i| at + i)
        .or_else(|| text[..at].rfind('\n'));
    match newline {
        Some(i) if i > 0 && bytes[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// End of the line holding `at` (before any `\r\n`) when the rest of that
/// line is blank or a comment, otherwise `at` itself.
fn insertion_point(text: &str, at: usize) -> usize {
    let line_end = text[at..].find('\n').map(|i| at + i).unwrap_or(text.len());
    let rest = text[at..line_end].trim();
    if !(rest.is_empty() || rest.starts_with('#')) {
        return at;
    }
    if line_end > at && text.as_bytes()[line_end - 1] == b'\r' {
        line_end - 1
    } else {
        line_end
    }
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn replace_span(text: &str, span: Span, with: &str) -> String {
    let mut out = String::with_capacity(text.len() + with.len());
    out.push_str(&text[..span.start]);
    out.push_str(with);
    out.push_str(&text[span.end..]);
    out
}

fn field_declaration(field_name: &str, expression: &str) -> String {
    let name = FieldKey::new("", field_name).full_field_name;
    if expression.is_empty() {
        name
    } else {
        format!("{} = {}", name, expression)
    }
}

/// Insert a field on a new line right after the table's last field, or after
/// the table header when the table has no fields yet. A trailing comment on
/// the anchor line stays on that line.
pub fn append_field(
    sheet_text: &str,
    table_name: &str,
    field_name: &str,
    expression: &str,
) -> Option<String> {
    let sheet = parse_sheet(sheet_text);
    let table = sheet.table(table_name)?;

    let (anchor, indent) = match table.last_field() {
        Some(last) => {
            let start = line_start(sheet_text, last.span.start);
            let prefix = &sheet_text[start..last.span.start];
            let indent = if !prefix.is_empty() && prefix.trim().is_empty() {
                prefix
            } else {
                DEFAULT_INDENT
            };
            (last.span.end, indent)
        }
        None => (table.name_span.end, DEFAULT_INDENT),
    };
    let anchor = insertion_point(sheet_text, anchor);

    let insertion = format!(
        "{}{}{}",
        line_break_at(sheet_text, anchor),
        indent,
        field_declaration(field_name, expression)
    );
    Some(replace_span(sheet_text, Span::new(anchor, anchor), &insertion))
}

/// Replace the expression of a field, adding ` = expression` if it has none.
pub fn set_field_expression(
    sheet_text: &str,
    table_name: &str,
    field_name: &str,
    expression: &str,
) -> Option<String> {
    let sheet = parse_sheet(sheet_text);
    let field = sheet.table(table_name)?.field(field_name)?;

    Some(match field.expression_span {
        Some(span) => replace_span(sheet_text, span, expression),
        None => {
            let at = field.name_span.end;
            replace_span(sheet_text, Span::new(at, at), &format!(" = {}", expression))
        }
    })
}

/// Remove a field declaration together with its decorators and modifiers.
/// A declaration alone on its line(s) takes the line break with it.
pub fn remove_field(sheet_text: &str, table_name: &str, field_name: &str) -> Option<String> {
    let sheet = parse_sheet(sheet_text);
    let field = sheet.table(table_name)?.field(field_name)?;

    let bytes = sheet_text.as_bytes();
    let mut start = field.span.start;
    let mut end = field.span.end;

    let before_start = line_start(sheet_text, start);
    let alone_before = sheet_text[before_start..start].trim().is_empty();
    let after_end = sheet_text[end..]
        .find('\n')
        .map(|i| end + i)
        .unwrap_or(sheet_text.len());
    let alone_after = sheet_text[end..after_end].trim().is_empty();

    if alone_before && alone_after {
        start = before_start;
        end = if after_end < sheet_text.len() {
            after_end + 1
        } else {
            after_end
        };
        // Last line of the text: drop the break that preceded it instead.
        if after_end == sheet_text.len() && start > 0 {
            start -= 1;
            if start > 0 && bytes[start - 1] == b'\r' {
                start -= 1;
            }
        }
    } else {
        while start > before_start && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
    }

    Some(replace_span(sheet_text, Span::new(start, end), ""))
}

/// Rewrite the name token of a table declaration.
pub fn rename_table(sheet_text: &str, table_name: &str, new_name: &str) -> Option<String> {
    let sheet = parse_sheet(sheet_text);
    let table = sheet.table(table_name)?;
    Some(replace_span(sheet_text, table.name_span, new_name))
}
