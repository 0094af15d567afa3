/// Structured error types for storefront-db.
///
/// Uses `thiserror` for better API surface and error composition.
/// Callers decide whether to retry, degrade, or fail the enclosing
/// request; nothing in this crate retries on its own.
use thiserror::Error;

/// Result type alias for storefront-db operations
pub type Result<T> = std::result::Result<T, DatastoreError>;

/// Main error type for datastore access
#[derive(Error, Debug)]
pub enum DatastoreError {
    /// Required settings missing or malformed. Fatal; retrying without
    /// fixing configuration will fail the same way.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Failed to establish the datastore session. Surfaced uncaught to
    /// the caller; never cached, never retried internally.
    #[error("failed to establish datastore session: {source}")]
    Connection {
        #[source]
        source: sqlx::Error,
    },

    /// A read against a resolved namespace failed
    #[error("query against {relation} failed: {source}")]
    Query {
        relation: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DatastoreError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a connection error from the underlying transport failure
    pub fn connection(source: sqlx::Error) -> Self {
        Self::Connection { source }
    }

    /// Create a query error naming the relation the read ran against
    pub fn query(relation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            relation: relation.into(),
            source,
        }
    }

    /// True for errors that are fatal until configuration changes
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
