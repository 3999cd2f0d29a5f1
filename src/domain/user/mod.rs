//! User module - the account aggregate and its value objects.
//!
//! # Domain Invariants
//!
//! 1. A user's identity is a v4 UUID and never changes
//! 2. Email and username are optional but each is unique when present
//! 3. `UserCreated` is raised only for brand-new users, never on rehydration

mod aggregate;
mod email;
mod errors;
mod events;
mod password_hash;
mod user_id;
pub mod username;

pub use aggregate::{User, UserProperties};
pub use email::Email;
pub use errors::{UniqueField, UserError};
pub use events::{UserCreated, UserEvent};
pub use password_hash::PasswordHash;
pub use user_id::UserId;
pub use username::Username;
