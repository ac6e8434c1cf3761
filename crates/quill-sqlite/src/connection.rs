//! SQLite connection implementation

use std::path::PathBuf;

use parking_lot::Mutex;
use quill_core::{Connection, QuillError, Result, StatementOutcome, Value};
use rusqlite::{Connection as RusqliteConnection, Statement};

/// SQLite connection wrapper
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Mutex<RusqliteConnection>,
}

impl SqliteConnection {
    /// Open a SQLite database.
    ///
    /// `path` may be `:memory:`, a `file:` URI, a `~/`-prefixed path, or a
    /// plain relative or absolute path. An unopenable path surfaces as a
    /// connection error.
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");
        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory()
        } else {
            RusqliteConnection::open(resolve_path(path)?)
        }
        .map_err(|e| {
            QuillError::Connection(format!("Failed to open SQLite database '{}': {}", path, e))
        })?;

        // foreign_keys is off by default; WAL keeps readers unblocked while
        // a write is in flight.
        for (pragma, value) in [("foreign_keys", "ON"), ("journal_mode", "WAL")] {
            conn.pragma_update(None, pragma, value).map_err(|e| {
                QuillError::Connection(format!("Failed to set {} pragma: {}", pragma, e))
            })?;
        }

        tracing::info!("SQLite connection established");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }
}

/// Resolve a user-facing path to something the driver opens directly.
/// `file:` URIs pass through untouched (the default open flags include URI
/// support), `~/` expands against `$HOME`, and bare relative paths are
/// anchored to the current working directory.
fn resolve_path(path: &str) -> Result<PathBuf> {
    if path.starts_with("file:") {
        return Ok(PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var_os("HOME").ok_or_else(|| {
            QuillError::Configuration("cannot expand '~': HOME is not set".into())
        })?;
        return Ok(PathBuf::from(home).join(rest));
    }
    let path = PathBuf::from(path);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir().map_err(QuillError::Io)?.join(path))
    }
}

impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    fn execute(&self, sql: &str, params: &[(String, Value)]) -> Result<StatementOutcome> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| QuillError::Execution(format!("Failed to prepare statement: {}", e)))?;
        bind_named(&mut stmt, params)?;

        let affected_rows = stmt
            .raw_execute()
            .map_err(|e| QuillError::Execution(format!("Failed to execute statement: {}", e)))?;
        let last_insert_id = conn.last_insert_rowid();

        tracing::debug!(affected_rows, last_insert_id, "statement executed");
        Ok(StatementOutcome {
            affected_rows: affected_rows as u64,
            last_insert_id,
        })
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    fn query(&self, sql: &str, params: &[(String, Value)]) -> Result<Vec<Vec<Value>>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| QuillError::Execution(format!("Failed to prepare query: {}", e)))?;
        bind_named(&mut stmt, params)?;

        let column_count = stmt.column_count();
        let mut rows = Vec::new();
        let mut query_rows = stmt.raw_query();

        while let Some(row) = query_rows
            .next()
            .map_err(|e| QuillError::Execution(format!("Failed to fetch row: {}", e)))?
        {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(rusqlite_to_value(row, i)?);
            }
            rows.push(values);
        }

        tracing::debug!(row_count = rows.len(), "query executed");
        Ok(rows)
    }
}

/// Bind each `(name, value)` pair to the statement's `:name` slot. Names not
/// present in the statement text are skipped; SQLite leaves unbound slots NULL.
fn bind_named(stmt: &mut Statement<'_>, params: &[(String, Value)]) -> Result<()> {
    for (name, value) in params {
        let marker = format!(":{}", name);
        let index = stmt
            .parameter_index(&marker)
            .map_err(|e| QuillError::Execution(format!("Failed to resolve parameter: {}", e)))?;
        match index {
            Some(index) => stmt
                .raw_bind_parameter(index, value_to_rusqlite(value))
                .map_err(|e| {
                    QuillError::Execution(format!("Failed to bind parameter '{}': {}", name, e))
                })?,
            None => tracing::trace!(parameter = %name, "parameter not referenced by statement"),
        }
    }
    Ok(())
}

/// Convert our Value type to a rusqlite-compatible value
fn value_to_rusqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(if *b { 1 } else { 0 }),
        Value::Int64(i) => rusqlite::types::Value::Integer(*i),
        Value::Float64(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
        Value::Date(d) => rusqlite::types::Value::Text(d.to_string()),
        Value::DateTime(dt) => rusqlite::types::Value::Text(dt.to_string()),
        Value::Json(j) => rusqlite::types::Value::Text(j.to_string()),
    }
}

/// Convert a rusqlite row value to our Value type
fn rusqlite_to_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    use rusqlite::types::ValueRef;

    let value_ref = row
        .get_ref(idx)
        .map_err(|e| QuillError::Execution(e.to_string()))?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    };

    Ok(value)
}
