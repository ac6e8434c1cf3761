//! Callable query methods
//!
//! A [`QueryMethod`] pairs one query definition with one connection and is
//! stateless beyond that pairing: each invocation validates its arguments,
//! splices raw substitutions into the template, executes through the
//! connection, and dispatches on the query kind. Invocations are
//! independent; the only mutable state is function-local.

use std::collections::BTreeMap;
use std::sync::Arc;

use quill_core::{Connection, Value};

use crate::Result;
use crate::error::ArgumentError;
use crate::rows::RowSet;
use crate::template::{QueryDefinition, QueryKind};

/// Call arguments: either positional values or named values, never both.
///
/// Positional values bind to the declared parameters in order, one value
/// per slot (a name declared twice takes two slots). Named values must
/// cover the declared parameter set exactly; their order is irrelevant.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl Arguments {
    /// The empty argument list, for templates that declare no parameters.
    /// Also the starting point for the [`arg`](Self::arg) and
    /// [`bind`](Self::bind) builders.
    pub fn none() -> Self {
        Self::default()
    }

    /// All-positional arguments from a uniform collection
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }

    /// All-named arguments from a uniform collection of pairs
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            positional: Vec::new(),
            named: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a named argument
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }
}

/// What invoking a query method produced, by query kind.
#[derive(Debug, Clone)]
pub enum QueryOutput {
    /// Identifier the connection assigned to the row an INSERT created
    Inserted(i64),
    /// Rows fetched by a read query
    Rows(RowSet),
    /// A statement executed for its side effect
    Done,
}

impl QueryOutput {
    /// The fetched rows, if this was a read query
    pub fn into_rows(self) -> Option<RowSet> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// The inserted row id, if this was an insert
    pub fn inserted_id(&self) -> Option<i64> {
        match self {
            QueryOutput::Inserted(id) => Some(*id),
            _ => None,
        }
    }
}

/// A callable query bound to one definition and one connection.
pub struct QueryMethod {
    definition: QueryDefinition,
    connection: Arc<dyn Connection>,
}

impl std::fmt::Debug for QueryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryMethod")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl QueryMethod {
    pub fn new(definition: QueryDefinition, connection: Arc<dyn Connection>) -> Self {
        Self {
            definition,
            connection,
        }
    }

    /// The definition this method executes
    pub fn definition(&self) -> &QueryDefinition {
        &self.definition
    }

    /// Invoke the query.
    ///
    /// Validates the arguments against the declared parameters, splices raw
    /// substitution values into the template text, passes the rest to the
    /// connection as bound values, and executes once. Connection failures
    /// propagate unchanged; nothing is retried.
    pub fn call(&self, args: &Arguments) -> Result<QueryOutput> {
        let values = self.bind_arguments(args)?;
        let sql = self.substituted_sql(&values);
        let bound: Vec<(String, Value)> = values
            .into_iter()
            .filter(|(name, _)| self.definition.is_bound(name))
            .collect();

        tracing::debug!(kind = ?self.definition.kind(), "invoking query");
        match self.definition.kind() {
            QueryKind::Insert => {
                let outcome = self.connection.execute(&sql, &bound)?;
                Ok(QueryOutput::Inserted(outcome.last_insert_id))
            }
            QueryKind::Select => {
                let raw = self.connection.query(&sql, &bound)?;
                Ok(QueryOutput::Rows(RowSet::new(
                    self.definition.columns(),
                    raw,
                )))
            }
            QueryKind::Other => {
                self.connection.execute(&sql, &bound)?;
                Ok(QueryOutput::Done)
            }
        }
    }

    /// Resolve call arguments to a name-to-value map.
    fn bind_arguments(
        &self,
        args: &Arguments,
    ) -> std::result::Result<BTreeMap<String, Value>, ArgumentError> {
        let declared = self.definition.parameters();

        if !args.positional.is_empty() && !args.named.is_empty() {
            return Err(ArgumentError::MixedArguments);
        }

        if !args.positional.is_empty() {
            if args.positional.len() != declared.len() {
                return Err(ArgumentError::PositionalCountMismatch {
                    expected: declared.len(),
                    actual: args.positional.len(),
                });
            }
            // Slot i binds to the i-th declared name; a duplicated name
            // keeps the value of its last slot.
            return Ok(declared
                .iter()
                .cloned()
                .zip(args.positional.iter().cloned())
                .collect());
        }

        // Named (or empty) call: the supplied key set must equal the
        // declared parameter set.
        let mut missing: Vec<String> = declared
            .iter()
            .filter(|name| !args.named.contains_key(*name))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        let unexpected: Vec<String> = args
            .named
            .keys()
            .filter(|key| !declared.contains(key))
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(ArgumentError::ParameterSetMismatch {
                missing,
                unexpected,
            });
        }
        Ok(args.named.clone())
    }

    /// Splice raw substitution values into the template text.
    ///
    /// Substitution points are unescaped by definition; the caller owns the
    /// safety of any value bound to a substitution parameter.
    fn substituted_sql(&self, values: &BTreeMap<String, Value>) -> String {
        let mut sql = self.definition.sql().to_string();
        for (name, value) in values {
            if self.definition.is_substitution(name) {
                let marker = format!("{{{}}}", name);
                sql = sql.replace(&marker, &value.to_string());
            }
        }
        sql
    }
}
