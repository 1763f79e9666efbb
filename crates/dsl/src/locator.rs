//! Table and field lookup over sheet text.
//!
//! Names are matched exactly as written: `'t1'` and `t1` are different tables.
//! Absence is an ordinary outcome and comes back as `None`.

use crate::model::{FieldRef, TableRef};
use crate::parser::parse_sheet;

/// First table in document order whose declared name equals `table_name`.
pub fn find_table(sheet_text: &str, table_name: &str) -> Option<TableRef> {
    parse_sheet(sheet_text)
        .tables
        .into_iter()
        .find(|t| t.table_name == table_name)
}

/// Field `field_name` (bare, without brackets) of table `table_name`.
/// Only the table's own fields are searched.
pub fn find_table_field(sheet_text: &str, table_name: &str, field_name: &str) -> Option<FieldRef> {
    let table = find_table(sheet_text, table_name)?;
    table
        .fields
        .into_iter()
        .find(|f| f.key.field_name == field_name)
}

/// Last field in declaration order, `None` for a table without fields.
pub fn find_last_table_field(sheet_text: &str, table_name: &str) -> Option<FieldRef> {
    find_table(sheet_text, table_name)?.fields.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldKey;

    const TWO_TABLES: &str = "table t1 key [f1]=1\n [f2]=2\n table t2 [f1]=1";

    #[test]
    fn test_find_table_by_name() {
        let table = find_table(TWO_TABLES, "t1").unwrap();
        assert_eq!(table.table_name, "t1");
    }

    #[test]
    fn test_find_table_by_quoted_name() {
        let dsl = "table t1 key [f1]=1\n [f2]=2\n table 'some table' [f1]=1";
        let table = find_table(dsl, "'some table'").unwrap();
        assert_eq!(table.table_name, "'some table'");
    }

    #[test]
    fn test_find_table_missing() {
        assert!(find_table(TWO_TABLES, "t111").is_none());
    }

    #[test]
    fn test_find_table_quoted_and_bare_are_distinct() {
        let dsl = "table 't1' [a]=1\ntable t1 [b]=2";
        assert_eq!(find_table(dsl, "t1").unwrap().field_names(), vec!["b"]);
        assert_eq!(find_table(dsl, "'t1'").unwrap().field_names(), vec!["a"]);
    }

    #[test]
    fn test_find_table_first_match_wins() {
        let dsl = "table t1 [a]=1\ntable t1 [b]=2";
        assert_eq!(find_table(dsl, "t1").unwrap().field_names(), vec!["a"]);
    }

    #[test]
    fn test_find_last_table_field() {
        let dsl = "table t1 key [f1]=1\n [f2]=2\n [f3]=3\n [f4]=4\n table t2 [f1]=1";
        let field = find_last_table_field(dsl, "t1").unwrap();
        assert_eq!(field.key, FieldKey::new("t1", "f4"));
    }

    #[test]
    fn test_find_last_table_field_missing_table() {
        let dsl = "table t1 key [f1]=1\n [f2]=2\n [f3]=3\n [f4]=4\n table t2 [f1]=1";
        assert!(find_last_table_field(dsl, "t33").is_none());
    }

    #[test]
    fn test_find_last_table_field_no_fields() {
        let dsl = "table t1 key [f1]=1\n [f2]=2\n [f3]=3\n [f4]=4\n table t2";
        assert!(find_last_table_field(dsl, "t2").is_none());
    }

    #[test]
    fn test_find_table_field() {
        let field = find_table_field(TWO_TABLES, "t1", "f2").unwrap();
        assert_eq!(
            field.key,
            FieldKey {
                field_name: "f2".to_string(),
                full_field_name: "[f2]".to_string(),
                table_name: "t1".to_string(),
            }
        );
    }

    #[test]
    fn test_find_table_field_missing_table() {
        assert!(find_table_field(TWO_TABLES, "t111", "f2").is_none());
    }

    #[test]
    fn test_find_table_field_belongs_to_other_table() {
        let dsl = "table t1 key [f1]=1\n [f2]=2\n table t2 [f3]=3";
        assert!(find_table_field(dsl, "t1", "f3").is_none());
        assert!(find_table_field(dsl, "t2", "f3").is_some());
    }

    #[test]
    fn test_find_table_field_in_quoted_table() {
        let dsl = "table 'my data'\n  [first name] = \"a\"";
        let field = find_table_field(dsl, "'my data'", "first name").unwrap();
        assert_eq!(field.key.full_field_name, "[first name]");
        assert_eq!(field.key.table_name, "'my data'");
    }
}
