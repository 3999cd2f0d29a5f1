//! User repository port (write side).
//!
//! A repository is always bound to an open storage transaction. It is
//! obtained from [`StorageTransaction::users`](super::StorageTransaction::users)
//! and its writes become visible only when that transaction commits.

use async_trait::async_trait;

use crate::domain::foundation::InfrastructureError;
use crate::domain::user::{Email, User, UserId, Username};

/// Transaction-bound persistence for the User aggregate.
///
/// Implementations must:
/// - Enforce uniqueness of email and username, reporting a clash as
///   `InfrastructureError::Conflict`
/// - Rehydrate users without raising domain events
#[async_trait]
pub trait UserRepository: Send {
    /// Find a user by id. Returns `None` if not found.
    async fn get_by_id(&mut self, id: &UserId) -> Result<Option<User>, InfrastructureError>;

    /// Find a user by its unique email.
    async fn get_by_email(&mut self, email: &Email) -> Result<Option<User>, InfrastructureError>;

    /// Find a user by its unique username.
    async fn get_by_username(
        &mut self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the email or username is taken
    /// - `Database` on persistence failure
    async fn create(&mut self, user: &User) -> Result<(), InfrastructureError>;

    /// Overwrite an existing user's state.
    async fn update(&mut self, user: &User) -> Result<(), InfrastructureError>;
}
