//! Token-stream scans that build query definitions
//!
//! Two single left-to-right passes over the classified token stream: one
//! collects named parameters and their substitution flags, one collects the
//! output column names of a read query. Neither backtracks nor inspects
//! more than the current token.

use super::tokens::{self, TemplateToken, TokenKind};
use super::{QueryDefinition, QueryKind};
use crate::error::ScanError;

pub(super) fn build(sql: &str) -> Result<QueryDefinition, ScanError> {
    let stream = tokens::tokenize(sql)?;
    let kind = detect_kind(&stream);
    let (parameters, substitution_flags) = scan_parameters(&stream)?;
    let columns = match kind {
        QueryKind::Select => scan_columns(&stream)?,
        _ => Vec::new(),
    };

    tracing::debug!(
        ?kind,
        parameter_count = parameters.len(),
        column_count = columns.len(),
        "query definition built"
    );
    Ok(QueryDefinition {
        sql: sql.to_string(),
        kind,
        parameters,
        substitution_flags,
        columns,
    })
}

/// The leading keyword decides the kind; anything that does not open with
/// INSERT or SELECT executes as a plain statement.
fn detect_kind(stream: &[TemplateToken]) -> QueryKind {
    for token in stream {
        match token.kind {
            TokenKind::Whitespace => continue,
            TokenKind::Keyword if token.text.eq_ignore_ascii_case("INSERT") => {
                return QueryKind::Insert;
            }
            TokenKind::Keyword if token.text.eq_ignore_ascii_case("SELECT") => {
                return QueryKind::Select;
            }
            _ => break,
        }
    }
    QueryKind::Other
}

/// Collect parameter names in first-occurrence order, duplicates preserved.
///
/// One flag tracks whether the walk is inside a `{...}` substitution block.
/// Placeholders capture the current flag; any word between the braces
/// registers as a substitution parameter. The braces themselves are never
/// captured, and leaving them unbalanced rejects the template.
fn scan_parameters(stream: &[TemplateToken]) -> Result<(Vec<String>, Vec<bool>), ScanError> {
    let mut parameters = Vec::new();
    let mut flags = Vec::new();
    let mut in_substitution = false;

    for token in stream {
        match token.kind {
            TokenKind::Placeholder => {
                // Anonymous markers like `?` carry no name and are not ours.
                if !token.text.is_empty() {
                    parameters.push(token.text.clone());
                    flags.push(in_substitution);
                }
            }
            TokenKind::Punctuation if token.text == "{" => {
                if in_substitution {
                    return Err(ScanError::UnbalancedBraces);
                }
                in_substitution = true;
            }
            TokenKind::Punctuation if token.text == "}" => {
                if !in_substitution {
                    return Err(ScanError::UnbalancedBraces);
                }
                in_substitution = false;
            }
            TokenKind::Keyword | TokenKind::Name if in_substitution => {
                parameters.push(token.text.clone());
                flags.push(true);
            }
            _ => {}
        }
    }

    if in_substitution {
        return Err(ScanError::UnbalancedBraces);
    }
    Ok((parameters, flags))
}

/// Collect output column names from the select list.
///
/// Capturing starts at SELECT and stops dead at FROM. A name that follows
/// another name with no intervening whitespace replaces it, which collapses
/// a qualified `t.col` to `col`; a name after AS replaces the previous
/// capture with the alias. This is a heuristic over tokens, not expression
/// parsing: an unaliased expression contributes only its last bare name,
/// and `*` is punctuation, so a wildcard select yields no columns at all.
fn scan_columns(stream: &[TemplateToken]) -> Result<Vec<String>, ScanError> {
    let mut columns: Vec<String> = Vec::new();
    let mut capture = false;
    let mut grouped = false;
    let mut expect_alias = false;
    let mut saw_wildcard = false;

    for token in stream {
        match token.kind {
            TokenKind::Keyword if token.text.eq_ignore_ascii_case("SELECT") => {
                capture = true;
            }
            TokenKind::Keyword if token.text.eq_ignore_ascii_case("FROM") => {
                break;
            }
            _ if !capture => {}
            TokenKind::Keyword if token.text.eq_ignore_ascii_case("AS") => {
                expect_alias = true;
            }
            TokenKind::Name => {
                if grouped || expect_alias {
                    columns.pop();
                }
                columns.push(token.text.clone());
                grouped = true;
                expect_alias = false;
            }
            TokenKind::Whitespace => {
                grouped = false;
            }
            TokenKind::Punctuation if token.text == "*" => {
                saw_wildcard = true;
            }
            _ => {}
        }
    }

    if columns.is_empty() && !saw_wildcard {
        return Err(ScanError::NoColumns);
    }
    Ok(columns)
}
