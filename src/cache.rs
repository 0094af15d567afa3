//! Cached, lazily-initialized access to the storefront datastore.
//!
//! # Responsibility
//! - Hold at most one live session for the lifetime of the process.
//! - Establish it on first use; serve the cached session afterwards.
//! - Surface creation failures to the caller without retrying.
//!
//! # Invariants
//! - First-population is guarded by a single in-flight creation attempt;
//!   concurrent first callers await the same attempt instead of racing.
//! - A failed attempt stores nothing, so the next call tries again.
//! - Once populated, the slot is never cleared; the session outlives the
//!   process.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::DatastoreConfig;
use crate::diagnostics;
use crate::error::{DatastoreError, Result};
use crate::namespace::Namespace;

/// An established datastore session.
///
/// Expensive to create, cheap to reuse. Clones share the underlying pool.
#[derive(Debug, Clone)]
pub struct Handle {
    pool: PgPool,
    established_at: DateTime<Utc>,
    transport: DatastoreConfig,
}

impl Handle {
    /// The live connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// When this session was established
    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// The transport configuration the session was built with
    pub fn transport(&self) -> &DatastoreConfig {
        &self.transport
    }
}

/// Single-slot cache over the datastore session.
///
/// Owned and injectable: construct one per process and pass it to whatever
/// serves requests. Tests construct their own for isolation.
pub struct ConnectionCache {
    config: DatastoreConfig,
    slot: OnceCell<Handle>,
}

impl ConnectionCache {
    pub fn new(config: DatastoreConfig) -> Self {
        Self {
            config,
            slot: OnceCell::new(),
        }
    }

    /// Build a cache from the process environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(DatastoreConfig::from_env()?))
    }

    pub fn config(&self) -> &DatastoreConfig {
        &self.config
    }

    /// The cached handle, if the slot has been populated
    pub fn cached(&self) -> Option<&Handle> {
        self.slot.get()
    }

    /// Return the cached handle, establishing the session on first use.
    ///
    /// Returns the cached handle immediately when the slot is populated
    /// (no validation, no freshness check, no I/O). Otherwise establishes
    /// a new session; concurrent first callers await the same attempt.
    ///
    /// # Errors
    ///
    /// `DatastoreError::Configuration` if the endpoint is missing or
    /// malformed (checked before any network I/O), or
    /// `DatastoreError::Connection` if establishing the session fails.
    /// Failures are not cached: the slot stays empty and the next call
    /// attempts creation again.
    pub async fn acquire(&self) -> Result<&Handle> {
        self.slot.get_or_try_init(|| self.establish()).await
    }

    /// Derive the configured namespace from an established handle.
    ///
    /// Deterministic and side-effect-free; never fails for a valid handle.
    pub fn resolve_namespace(&self, handle: &Handle) -> Namespace {
        Namespace::new(handle.pool().clone(), self.config.namespace.clone())
    }

    async fn establish(&self) -> Result<Handle> {
        let options = self.connect_options()?;

        let connected = PgPoolOptions::new()
            .max_connections(self.config.max_pool_size)
            .acquire_timeout(self.config.connect_timeout)
            .connect_with(options)
            .await;

        match connected {
            Ok(pool) => {
                info!(
                    category = diagnostics::CONNECTION_ESTABLISHED,
                    endpoint = %self.config.redacted_endpoint(),
                    namespace = %self.config.namespace,
                    max_pool_size = self.config.max_pool_size,
                    "datastore session established"
                );
                Ok(Handle {
                    pool,
                    established_at: Utc::now(),
                    transport: self.config.clone(),
                })
            }
            Err(err) => {
                warn!(
                    category = diagnostics::CONNECTION_FAILED,
                    endpoint = %self.config.redacted_endpoint(),
                    error = %err,
                    "failed to establish datastore session"
                );
                Err(DatastoreError::connection(err))
            }
        }
    }

    /// Validate the endpoint and build connect options. Runs before any
    /// network I/O so configuration mistakes never reach the transport.
    fn connect_options(&self) -> Result<PgConnectOptions> {
        let endpoint = self.config.endpoint.trim();

        if endpoint.is_empty() {
            return Err(DatastoreError::configuration(format!(
                "{} is not set",
                crate::config::ENDPOINT_VAR
            )));
        }

        if !endpoint.starts_with("postgres://") && !endpoint.starts_with("postgresql://") {
            return Err(DatastoreError::configuration(format!(
                "endpoint '{}' is not a postgres:// URI",
                self.config.redacted_endpoint()
            )));
        }

        let options = PgConnectOptions::from_str(endpoint).map_err(|err| {
            DatastoreError::configuration(format!("endpoint is malformed: {err}"))
        })?;

        // statement_timeout bounds each operation server-side; there is no
        // additional timeout layer in this crate.
        Ok(options.options([(
            "statement_timeout",
            self.config.socket_timeout.as_millis().to_string(),
        )]))
    }
}
