//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Argon2 password hashing and HS256 JWT tokens
//! - `email` - Resend HTTP transport and a logging fallback
//! - `events` - Event registry and the outbox dispatcher
//! - `http` - axum REST endpoints
//! - `memory` - In-memory persistence for tests and local runs
//! - `postgres` - PostgreSQL persistence via sqlx

pub mod auth;
pub mod email;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::{EventRegistry, OutboxDispatcher, OutboxDispatcherConfig};
