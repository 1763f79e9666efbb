// Sheet DSL scanner - turns sheet text into tables and fields
// Tables: `table <name>` or `table '<quoted name>'` ('' escapes a quote)
// Fields: `[name] = expression` up to end of line or `# comment`, optional `key` / `dim`
// Also understood: `!decorator(args)`, `# comments`, `override`, `apply`, `total` sections
//
// Scanning never fails. Problems are reported as diagnostics and the tables
// found before the problem are kept.

use crate::model::{Decorator, FieldKey, FieldRef, ParseDiagnostic, ParsedSheet, Span, TableRef};

/// Parse a whole sheet text.
pub fn parse_sheet(text: &str) -> ParsedSheet {
    Parser::new(text).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Fields,
    Total,
}

/// Decorators and modifiers seen but not yet attached to a table or field.
#[derive(Default)]
struct Pending {
    start: Option<usize>,
    decorators: Vec<Decorator>,
    is_key: bool,
    is_dim: bool,
}

impl Pending {
    fn mark(&mut self, at: usize) {
        self.start.get_or_insert(at);
    }
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tables: Vec<TableRef>,
    current: Option<TableRef>,
    section: Section,
    pending: Pending,
    diagnostics: Vec<ParseDiagnostic>,
}

fn is_word_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'[' | b'#' | b'!')
}

fn is_block_terminator(line: &str) -> bool {
    if line.is_empty() || line.starts_with('!') {
        return true;
    }
    matches!(
        line.split_whitespace().next(),
        Some("table") | Some("override") | Some("apply") | Some("total")
    )
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tables: Vec::new(),
            current: None,
            section: Section::Fields,
            pending: Pending::default(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> ParsedSheet {
        while self.skip_whitespace() {
            let keep_going = match self.bytes[self.pos] {
                b'#' => {
                    self.pos = self.line_end(self.pos);
                    true
                }
                b'!' => self.decorator(),
                b'[' => self.field(),
                _ => self.word(),
            };
            if !keep_going {
                break;
            }
        }
        self.close_table();

        ParsedSheet {
            tables: self.tables,
            diagnostics: self.diagnostics,
        }
    }

    /// Skip whitespace. Returns false at end of input.
    fn skip_whitespace(&mut self) -> bool {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self.pos < self.bytes.len()
    }

    fn skip_inline_whitespace(&mut self) {
        while self.pos < self.bytes.len() && matches!(self.bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// Index of the `\n` ending the line containing `from`, or end of input.
    fn line_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| from + i)
            .unwrap_or(self.bytes.len())
    }

    /// End of an expression starting at `from`: the first `#` outside a
    /// quoted string, or `line_end`.
    fn expression_end(&self, from: usize, line_end: usize) -> usize {
        let mut quote = None;
        for i in from..line_end {
            match (quote, self.bytes[i]) {
                (None, b'"' | b'\'') => quote = Some(self.bytes[i]),
                (None, b'#') => return i,
                (Some(q), b) if b == q => quote = None,
                _ => {}
            }
        }
        line_end
    }

    fn diagnostic(&mut self, offset: usize, message: impl Into<String>) {
        self.diagnostics.push(ParseDiagnostic {
            offset,
            message: message.into(),
        });
    }

    fn close_table(&mut self) {
        if let Some(table) = self.current.take() {
            self.tables.push(table);
        }
        self.section = Section::Fields;
    }

    fn read_word(&mut self) -> Span {
        let start = self.pos;
        while self.pos < self.bytes.len() && !is_word_delimiter(self.bytes[self.pos]) {
            self.pos += 1;
        }
        Span::new(start, self.pos)
    }

    /// Read a single-quoted name starting at the current `'`.
    /// Returns `None` if the quote is not closed on the same line.
    fn read_quoted(&mut self) -> Option<Span> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\'' => {
                    if self.bytes.get(self.pos + 1) == Some(&b'\'') {
                        self.pos += 2;
                        continue;
                    }
                    self.pos += 1;
                    return Some(Span::new(start, self.pos));
                }
                b'\n' => return None,
                _ => self.pos += 1,
            }
        }
        None
    }

    fn word(&mut self) -> bool {
        if self.bytes[self.pos] == b'\'' {
            let start = self.pos;
            if self.read_quoted().is_none() {
                self.diagnostic(start, "unterminated quoted name");
                return false;
            }
            return true;
        }

        let word = self.read_word();
        match word.slice(self.src) {
            "table" => self.table_header(word.start),
            "key" => {
                self.pending.mark(word.start);
                self.pending.is_key = true;
                true
            }
            "dim" => {
                self.pending.mark(word.start);
                self.pending.is_dim = true;
                true
            }
            "override" => {
                let span = self.block(word.start);
                match self.current.as_mut() {
                    Some(table) => {
                        table.override_span = Some(span);
                        table.span.end = span.end;
                    }
                    None => self.diagnostic(word.start, "override outside of a table"),
                }
                true
            }
            "apply" => {
                let span = self.block(word.start);
                match self.current.as_mut() {
                    Some(table) => {
                        table.apply_span = Some(span);
                        table.span.end = span.end;
                    }
                    None => self.diagnostic(word.start, "apply outside of a table"),
                }
                true
            }
            "total" => {
                if let Some(table) = self.current.as_mut() {
                    table.span.end = word.end;
                }
                self.section = Section::Total;
                true
            }
            _ => true,
        }
    }

    fn table_header(&mut self, keyword_start: usize) -> bool {
        self.close_table();
        self.skip_inline_whitespace();

        let name = if self.bytes.get(self.pos) == Some(&b'\'') {
            match self.read_quoted() {
                Some(span) => span,
                None => {
                    self.diagnostic(keyword_start, "unterminated quoted table name");
                    return false;
                }
            }
        } else {
            self.read_word()
        };

        let pending = std::mem::take(&mut self.pending);
        if name.is_empty() {
            self.diagnostic(keyword_start, "missing table name");
            return true;
        }

        self.current = Some(TableRef {
            table_name: name.slice(self.src).to_string(),
            decorators: pending.decorators,
            span: Span::new(pending.start.unwrap_or(keyword_start), name.end),
            name_span: name,
            fields: Vec::new(),
            totals: Vec::new(),
            override_span: None,
            apply_span: None,
        });
        true
    }

    fn field(&mut self) -> bool {
        let bracket_start = self.pos;
        let mut close = self.pos + 1;
        while close < self.bytes.len() && !matches!(self.bytes[close], b']' | b'\n') {
            close += 1;
        }
        if self.bytes.get(close) != Some(&b']') {
            self.diagnostic(bracket_start, "unterminated field name");
            return false;
        }

        let field_name = &self.src[bracket_start + 1..close];
        let name_span = Span::new(bracket_start, close + 1);
        self.pos = close + 1;

        let mut expression = None;
        let mut expression_span = None;
        self.skip_inline_whitespace();
        if self.bytes.get(self.pos) == Some(&b'=') {
            let raw_start = self.pos + 1;
            let line_end = self.line_end(raw_start);
            let raw = &self.src[raw_start..self.expression_end(raw_start, line_end)];
            let start = raw_start + (raw.len() - raw.trim_start().len());
            let span = Span::new(start, start + raw.trim().len());
            expression = Some(span.slice(self.src).to_string());
            expression_span = Some(span);
            self.pos = line_end;
        }

        let pending = std::mem::take(&mut self.pending);
        let end = expression_span.map_or(name_span.end, |s| s.end.max(name_span.end));

        let Some(table) = self.current.as_mut() else {
            self.diagnostic(
                bracket_start,
                format!("field [{}] declared outside of a table", field_name),
            );
            return true;
        };

        let field = FieldRef {
            key: FieldKey::new(table.table_name.clone(), field_name),
            is_key: pending.is_key,
            is_dim: pending.is_dim,
            decorators: pending.decorators,
            expression,
            span: Span::new(pending.start.unwrap_or(bracket_start), end),
            name_span,
            expression_span,
        };
        table.span.end = end;
        match self.section {
            Section::Fields => table.fields.push(field),
            Section::Total => table.totals.push(field),
        }
        true
    }

    fn decorator(&mut self) -> bool {
        let start = self.pos;
        self.pos += 1;
        let name_start = self.pos;
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric()
                || matches!(self.bytes[self.pos], b'_' | b'.'))
        {
            self.pos += 1;
        }
        let name = self.src[name_start..self.pos].to_string();
        if name.is_empty() {
            self.diagnostic(start, "empty decorator name");
            return true;
        }

        let mut args = None;
        if self.bytes.get(self.pos) == Some(&b'(') {
            let args_start = self.pos + 1;
            let mut depth = 0usize;
            let mut in_string = false;
            let mut close = None;
            for (i, &b) in self.bytes[self.pos..].iter().enumerate() {
                match b {
                    b'"' => in_string = !in_string,
                    b'(' if !in_string => depth += 1,
                    b')' if !in_string => {
                        depth -= 1;
                        if depth == 0 {
                            close = Some(self.pos + i);
                            break;
                        }
                    }
                    _ => {}
                }
            }
            let Some(close) = close else {
                self.diagnostic(start, format!("unterminated arguments of !{}", name));
                return false;
            };
            args = Some(self.src[args_start..close].to_string());
            self.pos = close + 1;
        }

        self.pending.mark(start);
        self.pending.decorators.push(Decorator {
            name,
            args,
            span: Span::new(start, self.pos),
        });
        true
    }

    /// Consume the rest of the keyword's line and every following line up to a
    /// blank line or a line starting another section, table or decorator.
    fn block(&mut self, keyword_start: usize) -> Span {
        self.pos = self.line_end(self.pos);
        while self.pos < self.bytes.len() {
            let line_start = self.pos + 1;
            let line_end = self.line_end(line_start);
            if is_block_terminator(self.src[line_start..line_end].trim()) {
                break;
            }
            self.pos = line_end;
        }

        let mut end = self.pos;
        while end > keyword_start && self.bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        Span::new(keyword_start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_and_fields_on_shared_lines() {
        let sheet = parse_sheet("table t1 key [f1]=1\n [f2]=2\n table t2 [f1]=1");

        assert_eq!(sheet.table_names(), vec!["t1", "t2"]);
        let t1 = sheet.table("t1").unwrap();
        assert_eq!(t1.field_names(), vec!["f1", "f2"]);
        assert!(t1.fields[0].is_key);
        assert!(!t1.fields[1].is_key);
        assert_eq!(t1.fields[0].expression.as_deref(), Some("1"));
        assert_eq!(sheet.table("t2").unwrap().field_names(), vec!["f1"]);
        assert!(!sheet.has_errors());
    }

    #[test]
    fn test_quoted_table_names_keep_quotes() {
        let text = "table 'some table' [f1]=1\ntable 'it''s' [a]=2";
        let sheet = parse_sheet(text);

        assert_eq!(sheet.table_names(), vec!["'some table'", "'it''s'"]);
        let t = sheet.table("'some table'").unwrap();
        assert_eq!(t.name_span.slice(text), "'some table'");
        assert!(sheet.table("some table").is_none());
    }

    #[test]
    fn test_spans_point_into_text() {
        let text = "table t1\n  [a] = 1 + [b]\r\n  [b] = 2\r\n";
        let sheet = parse_sheet(text);
        let t1 = sheet.table("t1").unwrap();

        let a = t1.field("a").unwrap();
        assert_eq!(a.name_span.slice(text), "[a]");
        assert_eq!(a.expression_span.unwrap().slice(text), "1 + [b]");
        assert_eq!(a.span.slice(text), "[a] = 1 + [b]");
        assert_eq!(t1.span.slice(text), "table t1\n  [a] = 1 + [b]\r\n  [b] = 2");
    }

    #[test]
    fn test_decorators_and_modifiers_attach_to_next_item() {
        let text = "!layout(1, 2, \"title\")\ntable t1\n  \
                    !format(\"number\", 2)\n  dim [a] = RANGE(5)\n  [b]";
        let sheet = parse_sheet(text);
        let t1 = sheet.table("t1").unwrap();

        assert_eq!(t1.decorators.len(), 1);
        assert_eq!(t1.decorators[0].name, "layout");
        assert_eq!(t1.decorators[0].args.as_deref(), Some("1, 2, \"title\""));
        assert_eq!(t1.span.start, 0);

        let a = t1.field("a").unwrap();
        assert!(a.is_dim);
        assert_eq!(a.decorators[0].name, "format");
        assert!(a.span.slice(text).starts_with("!format"));

        let b = t1.field("b").unwrap();
        assert!(b.decorators.is_empty());
        assert_eq!(b.expression, None);
    }

    #[test]
    fn test_comments_are_skipped() {
        let sheet = parse_sheet("# table hidden\ntable t1\n  # [x] = 1\n  [a] = 1");
        assert_eq!(sheet.table_names(), vec!["t1"]);
        assert_eq!(sheet.table("t1").unwrap().field_names(), vec!["a"]);
    }

    #[test]
    fn test_trailing_comment_is_not_part_of_expression() {
        let text = "table t1\n  [a] = 1 # note\n  [b] = \"x#y\"\n  [c] = 'my # table'[f] # why";
        let sheet = parse_sheet(text);
        let t1 = sheet.table("t1").unwrap();

        let a = t1.field("a").unwrap();
        assert_eq!(a.expression.as_deref(), Some("1"));
        assert_eq!(a.span.slice(text), "[a] = 1");
        assert_eq!(t1.field("b").unwrap().expression.as_deref(), Some("\"x#y\""));
        assert_eq!(t1.field("c").unwrap().expression.as_deref(), Some("'my # table'[f]"));
        assert_eq!(t1.field_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bang_ends_bare_table_name() {
        let sheet = parse_sheet("table a!b\n  [x] = 1");
        assert_eq!(sheet.table_names(), vec!["a"]);
        assert_eq!(sheet.table("a").unwrap().field_names(), vec!["x"]);
    }

    #[test]
    fn test_total_entries_are_not_fields() {
        let text = "table t1\n  [a] = RANGE(3)\ntotal\n  [a] = SUM([a])\ntable t2\n  [b] = 1";
        let sheet = parse_sheet(text);
        let t1 = sheet.table("t1").unwrap();

        assert_eq!(t1.field_names(), vec!["a"]);
        assert_eq!(t1.totals.len(), 1);
        assert_eq!(t1.totals[0].expression.as_deref(), Some("SUM([a])"));
        assert_eq!(sheet.table("t2").unwrap().field_names(), vec!["b"]);
    }

    #[test]
    fn test_override_and_apply_blocks_are_consumed() {
        let text = "table t1\n  [a] = 1\n  [b] = 2\n\
                    apply\nsort [a]\nfilter [b] > 1\n\
                    override\n[a],[b]\n1,2\n\n\
                    table t2\n  [c] = 3";
        let sheet = parse_sheet(text);
        let t1 = sheet.table("t1").unwrap();

        assert_eq!(t1.field_names(), vec!["a", "b"]);
        assert!(t1.has_override());
        assert_eq!(t1.override_span.unwrap().slice(text), "override\n[a],[b]\n1,2");
        assert_eq!(t1.apply_span.unwrap().slice(text), "apply\nsort [a]\nfilter [b] > 1");
        assert_eq!(sheet.table("t2").unwrap().field_names(), vec!["c"]);
    }

    #[test]
    fn test_field_outside_table_is_diagnosed() {
        let sheet = parse_sheet("[orphan] = 1\ntable t1 [a] = 1");
        assert_eq!(sheet.diagnostics.len(), 1);
        assert!(sheet.diagnostics[0].message.contains("orphan"));
        assert_eq!(sheet.table("t1").unwrap().field_names(), vec!["a"]);
    }

    #[test]
    fn test_unterminated_input_keeps_earlier_tables() {
        let sheet = parse_sheet("table t1 [a] = 1\ntable t2 [b");
        assert_eq!(sheet.table_names(), vec!["t1", "t2"]);
        assert!(sheet.table("t2").unwrap().fields.is_empty());
        assert_eq!(sheet.diagnostics[0].message, "unterminated field name");

        let sheet = parse_sheet("table t1 [a] = 1\ntable 'broken\n[b] = 2");
        assert_eq!(sheet.table_names(), vec!["t1"]);
        assert!(sheet.has_errors());
    }

    #[test]
    fn test_empty_and_bare_tables() {
        assert!(parse_sheet("").tables.is_empty());
        assert!(parse_sheet("   \n\r\n").tables.is_empty());

        let sheet = parse_sheet("table t1 key [f1]=1\n table t2");
        assert!(sheet.table("t2").unwrap().fields.is_empty());
    }

    #[test]
    fn test_missing_table_name() {
        let sheet = parse_sheet("table\n[a] = 1");
        assert!(sheet.tables.is_empty());
        assert_eq!(sheet.diagnostics[0].message, "missing table name");
    }
}
