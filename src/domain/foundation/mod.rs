//! Foundation module - Shared domain primitives.
//!
//! Contains the outcome algebra, error types, the aggregate base,
//! event primitives and timestamps that form the vocabulary of the
//! authentication domain.

mod aggregate;
mod auth;
mod errors;
mod events;
pub mod outcome;
mod timestamp;

pub use aggregate::{AggregateRoot, PendingEvents};
pub use auth::{AuthError, TokenClaims};
pub use errors::{ErrorCategory, ErrorDetail, InfrastructureError};
pub use events::{DomainEvent, EventId};
pub use outcome::{Outcome, OutcomeExt};
pub use timestamp::Timestamp;
