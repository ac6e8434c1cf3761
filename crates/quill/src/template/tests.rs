//! Tests for template scanning

use pretty_assertions::assert_eq;

use super::tokens::{TokenKind, tokenize};
use super::{QueryDefinition, QueryKind};
use crate::error::ScanError;

#[test]
fn tokenize_merges_colon_and_word_into_placeholder() {
    let tokens = tokenize("SELECT title FROM notes WHERE id = :id").unwrap();
    let placeholder = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Placeholder)
        .unwrap();
    assert_eq!(placeholder.text, "id");
}

#[test]
fn tokenize_classifies_braces_as_punctuation() {
    let tokens = tokenize("ORDER BY {col}").unwrap();
    let punct: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Punctuation)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(punct, vec!["{", "}"]);
}

#[test]
fn tokenize_keeps_double_colon_casts_out_of_placeholders() {
    let tokens = tokenize("SELECT price FROM items WHERE sku = :sku AND tag = label::text").unwrap();
    let names: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Placeholder)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(names, vec!["sku"]);
}

#[test]
fn kind_is_derived_from_leading_keyword() {
    let select = QueryDefinition::parse("SELECT id FROM notes").unwrap();
    assert_eq!(select.kind(), QueryKind::Select);

    let insert = QueryDefinition::parse("INSERT INTO notes (title) VALUES (:title)").unwrap();
    assert_eq!(insert.kind(), QueryKind::Insert);

    let update = QueryDefinition::parse("UPDATE notes SET title = :title").unwrap();
    assert_eq!(update.kind(), QueryKind::Other);

    let ddl = QueryDefinition::parse("CREATE TABLE notes (id INTEGER PRIMARY KEY)").unwrap();
    assert_eq!(ddl.kind(), QueryKind::Other);
}

#[test]
fn kind_detection_skips_leading_comments() {
    let def = QueryDefinition::parse("-- most recent notes\nSELECT id FROM notes").unwrap();
    assert_eq!(def.kind(), QueryKind::Select);
}

#[test]
fn parameters_are_collected_in_first_occurrence_order() {
    let def =
        QueryDefinition::parse("INSERT INTO notes (title, score) VALUES (:title, :score)").unwrap();
    assert_eq!(def.parameters(), &["title", "score"]);
    assert_eq!(def.substitution_flags(), &[false, false]);
}

#[test]
fn duplicate_parameters_are_preserved() {
    let def =
        QueryDefinition::parse("SELECT id FROM notes WHERE id = :v OR parent_id = :v").unwrap();
    assert_eq!(def.parameters(), &["v", "v"]);
    assert_eq!(def.substitution_flags(), &[false, false]);
}

#[test]
fn substitution_parameters_are_flagged() {
    let def = QueryDefinition::parse("SELECT id FROM notes ORDER BY {col}").unwrap();
    assert_eq!(def.parameters(), &["col"]);
    assert_eq!(def.substitution_flags(), &[true]);
}

#[test]
fn bound_and_substitution_parameters_mix_in_order() {
    let def = QueryDefinition::parse(
        "SELECT id FROM notes WHERE score > :min ORDER BY {col} {direction}",
    )
    .unwrap();
    assert_eq!(def.parameters(), &["min", "col", "direction"]);
    assert_eq!(def.substitution_flags(), &[false, true, true]);
}

#[test]
fn placeholder_inside_substitution_block_is_flagged() {
    let def = QueryDefinition::parse("SELECT id FROM notes ORDER BY {:col}").unwrap();
    assert_eq!(def.parameters(), &["col"]);
    assert_eq!(def.substitution_flags(), &[true]);
}

#[test]
fn parameters_inside_comments_are_ignored() {
    let def = QueryDefinition::parse("SELECT id FROM notes -- filter by :fake\nWHERE id = :id")
        .unwrap();
    assert_eq!(def.parameters(), &["id"]);
}

#[test]
fn parameters_inside_string_literals_are_ignored() {
    let def =
        QueryDefinition::parse("SELECT id FROM notes WHERE title = ':fake' AND id = :id").unwrap();
    assert_eq!(def.parameters(), &["id"]);
}

#[test]
fn select_columns_collapse_qualifiers_and_aliases() {
    let def = QueryDefinition::parse("SELECT a, b.c, d AS e FROM t").unwrap();
    assert_eq!(def.columns(), &["a", "c", "e"]);
}

#[test]
fn qualified_column_with_alias_keeps_the_alias() {
    let def = QueryDefinition::parse("SELECT n.title AS heading, n.score FROM notes n").unwrap();
    assert_eq!(def.columns(), &["heading", "score"]);
}

#[test]
fn column_scan_stops_at_from() {
    let def = QueryDefinition::parse("SELECT id FROM notes WHERE title = :title").unwrap();
    assert_eq!(def.columns(), &["id"]);
}

#[test]
fn non_select_templates_have_no_columns() {
    let def = QueryDefinition::parse("INSERT INTO notes (title) VALUES (:title)").unwrap();
    assert!(def.columns().is_empty());
}

#[test]
fn wildcard_select_yields_empty_columns() {
    // Known limitation: `*` is not an identifier token and is never
    // captured, so a wildcard select declares no columns.
    let def = QueryDefinition::parse("SELECT * FROM notes ORDER BY {col}").unwrap();
    assert!(def.columns().is_empty());
    assert_eq!(def.parameters(), &["col"]);
}

#[test]
fn select_without_resolvable_columns_is_rejected() {
    let err = QueryDefinition::parse("SELECT 1").unwrap_err();
    assert_eq!(err, ScanError::NoColumns);
}

#[test]
fn unbalanced_braces_are_rejected() {
    let err = QueryDefinition::parse("SELECT id FROM notes ORDER BY {col").unwrap_err();
    assert_eq!(err, ScanError::UnbalancedBraces);

    let err = QueryDefinition::parse("SELECT id FROM notes ORDER BY col}").unwrap_err();
    assert_eq!(err, ScanError::UnbalancedBraces);

    let err = QueryDefinition::parse("SELECT id FROM notes ORDER BY {{col}}").unwrap_err();
    assert_eq!(err, ScanError::UnbalancedBraces);
}

#[test]
fn definition_keeps_the_template_text_verbatim() {
    let sql = "SELECT id FROM notes WHERE id = :id";
    let def = QueryDefinition::parse(sql).unwrap();
    assert_eq!(def.sql(), sql);
}
