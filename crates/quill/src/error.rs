//! Query template errors

use quill_core::QuillError;
use thiserror::Error;

/// Errors raised while validating call arguments.
///
/// Always surfaced synchronously at the failing call, never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgumentError {
    /// A call supplied both positional and named arguments.
    #[error("use positional arguments or named arguments, not both")]
    MixedArguments,

    /// A positional call did not supply one value per declared parameter slot.
    #[error("expected {expected} positional arguments, got {actual}")]
    PositionalCountMismatch { expected: usize, actual: usize },

    /// A named call's key set differs from the declared parameter set.
    #[error(
        "named arguments do not match declared parameters: missing {missing:?}, unexpected {unexpected:?}"
    )]
    ParameterSetMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

/// Errors raised while building a query definition from template text.
///
/// These are load-time failures: a malformed template is rejected when the
/// definition is constructed, not on first call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScanError {
    #[error("failed to tokenize template: {0}")]
    Tokenize(String),

    #[error("unbalanced substitution braces in template")]
    UnbalancedBraces,

    #[error("read query has no resolvable output columns")]
    NoColumns,
}

/// Errors surfaced by query methods and the registry.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A connection failure, propagated unchanged.
    #[error(transparent)]
    Execution(#[from] QuillError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown query: {0}")]
    UnknownQuery(String),
}

/// Result type alias for Quill query operations
pub type Result<T> = std::result::Result<T, QueryError>;
