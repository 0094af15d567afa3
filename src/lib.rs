//! storefront-db: cached datastore access for the storefront
//!
//! The storefront keeps one session to its Postgres-backed catalog for the
//! lifetime of the process. Page generators acquire the cached handle,
//! resolve the configured namespace, and read products through it:
//!
//! ```ignore
//! let cache = ConnectionCache::from_env()?;
//! let handle = cache.acquire().await?;
//! let ns = cache.resolve_namespace(handle);
//! let product = ProductRepo::new(&ns).get_by_slug("enamel-mug").await?;
//! ```
//!
//! Creation failures surface to the caller without retry; the caller
//! decides whether to retry, degrade, or fall back.

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod namespace;
pub mod repos;

pub use cache::{ConnectionCache, Handle};
pub use config::{load_dotenv, DatastoreConfig};
pub use error::{DatastoreError, Result};
pub use models::ProductRecord;
pub use namespace::Namespace;
pub use repos::ProductRepo;
