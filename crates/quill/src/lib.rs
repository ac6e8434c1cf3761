//! Quill - SQL templates as callable queries
//!
//! Quill turns a directory of `.sql` template files into named, callable
//! query objects. Each template is scanned once, at load time, into an
//! immutable [`QueryDefinition`]: its effect kind (INSERT / SELECT / other),
//! its named parameters in first-occurrence order, which of those are raw
//! text substitutions, and - for read queries - its output column names.
//! A [`QueryMethod`] pairs a definition with a connection and validates
//! arguments, splices substitutions, executes, and shapes results.
//!
//! ## Template convention
//!
//! Bound parameters are written `:name` and travel to the driver escaped.
//! Raw substitution points are written `{name}` and are spliced into the
//! SQL as bare text before execution - unescaped, caller's responsibility.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quill::{Arguments, Database};
//! use quill_sqlite::SqliteConnection;
//!
//! let conn = Arc::new(SqliteConnection::open("notes.db")?);
//! let db = Database::load(conn, "queries/")?;
//!
//! // queries/add_note.sql: INSERT INTO notes (title) VALUES (:title)
//! let id = db.query("add_note")?
//!     .call(&Arguments::none().bind("title", "hello"))?
//!     .inserted_id();
//!
//! // queries/recent_notes.sql: SELECT id, title FROM notes ORDER BY {order_col} DESC
//! let rows = db.query("recent_notes")?
//!     .call(&Arguments::none().bind("order_col", "id"))?
//!     .into_rows();
//! ```

mod error;
mod method;
mod registry;
mod rows;
mod template;

pub use error::{ArgumentError, QueryError, Result, ScanError};
pub use method::{Arguments, QueryMethod, QueryOutput};
pub use registry::{Database, QueryRegistry};
pub use rows::{RowMap, RowSet};
pub use template::{QueryDefinition, QueryKind};

// Re-export the core vocabulary so callers rarely need quill-core directly.
pub use quill_core::{Connection, QuillError, StatementOutcome, Value};
