//! Template token classification
//!
//! A thin layer over the sqlparser tokenizer that reduces its token set to
//! the classes the template scanner cares about. Templates are tokenized,
//! never parsed: `{name}` substitution markers make them invalid as
//! statements, but they tokenize cleanly.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::error::ScanError;

/// Classification of a template token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A word sqlparser recognizes as a SQL keyword
    Keyword,
    /// Any other word, including quoted identifiers
    Name,
    /// A named bound-parameter marker; the text carries the bare name
    Placeholder,
    /// Single-character punctuation and operators
    Punctuation,
    /// Spaces, newlines, and comments
    Whitespace,
    /// Anything else: literals, numbers, multi-character operators
    Other,
}

/// A classified template token
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateToken {
    pub kind: TokenKind,
    pub text: String,
}

impl TemplateToken {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Tokenize template text into classified tokens.
///
/// `:name` markers arrive from sqlparser as a colon followed by a word;
/// the pair is merged here into a single placeholder token carrying the
/// bare name, so the scanner itself never needs lookahead. A `::` cast
/// stays untouched because sqlparser emits it as one token.
pub fn tokenize(sql: &str) -> Result<Vec<TemplateToken>, ScanError> {
    let dialect = SQLiteDialect {};
    let raw = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| ScanError::Tokenize(e.to_string()))?;

    let mut tokens = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some(token) = iter.next() {
        let classified = match token {
            Token::Colon => {
                if let Some(Token::Word(word)) = iter.next_if(|t| matches!(t, Token::Word(_))) {
                    TemplateToken::new(TokenKind::Placeholder, word.value)
                } else {
                    TemplateToken::new(TokenKind::Punctuation, ":")
                }
            }
            Token::Placeholder(text) => {
                let name = text.trim_start_matches([':', '$', '@', '?']);
                TemplateToken::new(TokenKind::Placeholder, name)
            }
            Token::Word(word) => {
                if word.keyword == Keyword::NoKeyword || word.quote_style.is_some() {
                    TemplateToken::new(TokenKind::Name, word.value)
                } else {
                    TemplateToken::new(TokenKind::Keyword, word.value)
                }
            }
            Token::Whitespace(ws) => TemplateToken::new(TokenKind::Whitespace, ws.to_string()),
            Token::LBrace => TemplateToken::new(TokenKind::Punctuation, "{"),
            Token::RBrace => TemplateToken::new(TokenKind::Punctuation, "}"),
            Token::Comma => TemplateToken::new(TokenKind::Punctuation, ","),
            Token::Period => TemplateToken::new(TokenKind::Punctuation, "."),
            Token::Mul => TemplateToken::new(TokenKind::Punctuation, "*"),
            Token::LParen => TemplateToken::new(TokenKind::Punctuation, "("),
            Token::RParen => TemplateToken::new(TokenKind::Punctuation, ")"),
            Token::SemiColon => TemplateToken::new(TokenKind::Punctuation, ";"),
            other => TemplateToken::new(TokenKind::Other, other.to_string()),
        };
        tokens.push(classified);
    }
    Ok(tokens)
}
