//! Read-side repositories over a resolved namespace.
//!
//! The storefront only reads through this layer; writes belong to the
//! catalog tooling that owns the tables.

pub mod products;

pub use products::ProductRepo;
