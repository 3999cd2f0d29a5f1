//! In-memory persistence adapters.
//!
//! Back the persistence ports with process memory. Used by the test suite
//! and for running the service locally without PostgreSQL.

mod store;

pub use store::InMemoryStore;
