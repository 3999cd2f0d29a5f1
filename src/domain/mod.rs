//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (outcome algebra, errors, aggregate base, events)
//! - `user` - User aggregate, value objects and events
//! - `events` - Closed registry of outbox event kinds

pub mod events;
pub mod foundation;
pub mod user;
