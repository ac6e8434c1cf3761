//! Query registry and database handle
//!
//! Discovers SQL templates on disk and exposes each one as a named query
//! method. Names are explicit map keys, not attributes conjured onto some
//! shared handle; lookups go through [`Database::query`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use quill_core::Connection;
use walkdir::WalkDir;

use crate::method::QueryMethod;
use crate::template::QueryDefinition;
use crate::{QueryError, Result};

/// Registry of query methods keyed by template name
#[derive(Debug)]
pub struct QueryRegistry {
    methods: HashMap<String, QueryMethod>,
}

impl QueryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Build a registry from every `*.sql` file under `dir`, recursively.
    ///
    /// Each template's name is its file stem. Templates are scanned here,
    /// at load time; a malformed template fails the whole load rather than
    /// deferring the error to its first call.
    pub fn load_dir(connection: Arc<dyn Connection>, dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| QueryError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let sql = std::fs::read_to_string(path)?;
            let definition = QueryDefinition::parse(&sql)?;
            registry.register(name, QueryMethod::new(definition, Arc::clone(&connection)));
        }
        tracing::info!(
            query_count = registry.methods.len(),
            dir = %dir.display(),
            "query registry loaded"
        );
        Ok(registry)
    }

    /// Register a query method under a name
    pub fn register(&mut self, name: &str, method: QueryMethod) {
        if self.methods.contains_key(name) {
            tracing::warn!(query = %name, "replacing existing query method");
        }
        tracing::debug!(query = %name, kind = ?method.definition().kind(), "registering query method");
        self.methods.insert(name.to_string(), method);
    }

    /// Get a query method by name
    pub fn get(&self, name: &str) -> Option<&QueryMethod> {
        self.methods.get(name)
    }

    /// List registered query names
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for QueryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A database handle: one connection plus the queries loaded for it.
///
/// The connection is injected explicitly and shared by every query method
/// the handle exposes.
pub struct Database {
    connection: Arc<dyn Connection>,
    registry: QueryRegistry,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Load every template under `dir` and bind it to `connection`
    pub fn load(connection: Arc<dyn Connection>, dir: impl AsRef<Path>) -> Result<Self> {
        let registry = QueryRegistry::load_dir(Arc::clone(&connection), dir.as_ref())?;
        Ok(Self {
            connection,
            registry,
        })
    }

    /// Look up a query method by name
    pub fn query(&self, name: &str) -> Result<&QueryMethod> {
        self.registry
            .get(name)
            .ok_or_else(|| QueryError::UnknownQuery(name.to_string()))
    }

    /// The underlying connection
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Names of all loaded queries
    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }
}
