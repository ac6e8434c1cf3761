//! Connection trait for Quill drivers

use crate::{Result, Value};

/// What a write statement reports back after executing.
#[derive(Debug, Clone, Copy)]
pub struct StatementOutcome {
    /// Number of rows the statement changed
    pub affected_rows: u64,
    /// Identifier the connection assigned to the most recently inserted row
    pub last_insert_id: i64,
}

/// A synchronous database connection.
///
/// Every operation runs to completion on the calling thread. Implementations
/// are expected to serialize concurrent callers internally; Quill performs
/// exactly one execute-or-query per invocation and imposes no transaction
/// discipline of its own.
///
/// Bound parameters are named: each `(name, value)` pair binds the `:name`
/// marker in the statement text. Query results come back as positional rows;
/// no column metadata is required from the driver.
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "sqlite")
    fn driver_name(&self) -> &str;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE/DDL)
    fn execute(&self, sql: &str, params: &[(String, Value)]) -> Result<StatementOutcome>;

    /// Execute a query and fetch all resulting rows, values in select-list order
    fn query(&self, sql: &str, params: &[(String, Value)]) -> Result<Vec<Vec<Value>>>;
}
