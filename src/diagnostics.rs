//! Category tags for diagnostic events.
//!
//! Every event this crate emits carries a `category` field with one of
//! these values, so subscribers filter by policy instead of matching on
//! message text. Spelling is kebab-case and stable; treat renames as
//! breaking.

/// A lookup targeted a record that does not exist.
pub const RESOURCE_NOT_FOUND: &str = "resource-not-found";

/// Establishing the datastore session failed.
pub const CONNECTION_FAILED: &str = "connection-failed";

/// A datastore session was established and cached.
pub const CONNECTION_ESTABLISHED: &str = "connection-established";
