//! User reader port (read side).
//!
//! Pool-bound lookups used outside any Unit of Work, such as login and
//! the outbox handlers.

use async_trait::async_trait;

use crate::domain::foundation::InfrastructureError;
use crate::domain::user::{Email, User, UserId, Username};

/// Read-only access to committed users.
#[async_trait]
pub trait UserReader: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfrastructureError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfrastructureError>;

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError>;
}
