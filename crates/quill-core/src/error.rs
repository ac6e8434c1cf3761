//! Error types for Quill

use thiserror::Error;

/// Core error type for Quill operations
#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Quill core operations
pub type Result<T> = std::result::Result<T, QuillError>;
