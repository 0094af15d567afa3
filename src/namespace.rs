//! Logical namespace resolution.
//!
//! A `Namespace` is the unit callers query against: a cheap clone of the
//! live pool plus the schema name resolved from configuration. Resolution
//! is deterministic and never performs I/O.

use sqlx::PgPool;

/// A named sub-resource selected from within an established session
#[derive(Debug, Clone)]
pub struct Namespace {
    pool: PgPool,
    schema: String,
}

impl Namespace {
    pub(crate) fn new(pool: PgPool, schema: String) -> Self {
        Self { pool, schema }
    }

    /// The underlying pool. Clones of `PgPool` share one set of
    /// connections.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The resolved schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Schema-qualified, quoted relation name for use in query text
    pub fn relation(&self, table: &str) -> String {
        format!("\"{}\".\"{}\"", self.schema, table)
    }
}
