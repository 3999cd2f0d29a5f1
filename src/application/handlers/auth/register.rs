//! RegisterHandler - Command handler for creating new users.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{issue_token, non_empty, off_runtime};
use crate::application::UnitOfWork;
use crate::domain::foundation::{AggregateRoot, ErrorDetail, InfrastructureError, Outcome};
use crate::domain::user::{UniqueField, User, UserError, UserId};
use crate::ports::{PasswordHasher, TokenService, TransactionFactory};

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Result of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub user_id: UserId,
    pub token: String,
}

/// Handler for registering users.
///
/// The user row and its `UserCreated` outbox record are committed in one
/// transaction; the validation email goes out later via the dispatcher.
pub struct RegisterHandler {
    transactions: Arc<dyn TransactionFactory>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl RegisterHandler {
    pub fn new(
        transactions: Arc<dyn TransactionFactory>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            transactions,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Outcome<AuthenticationResult> {
        let username = non_empty(cmd.username);
        let email = non_empty(cmd.email);
        if username.is_none() && email.is_none() {
            return Err(UserError::CredentialsRequired.into());
        }

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let digest = off_runtime(move || hasher.hash(&password))
            .await?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                ErrorDetail::internal(format!("Password hashing failed: {}", e))
            })?;

        let mut user = User::register(username, email, digest)?;

        let mut uow = UnitOfWork::new(self.transactions.clone());
        uow.start_transaction().await.map_err(persistence_failure)?;

        if let Err(detail) = self.persist(&mut uow, &mut user).await {
            if let Err(e) = uow.rollback().await {
                warn!(error = %e, "Rollback after failed registration also failed");
            }
            return Err(detail);
        }

        info!(user_id = %user.id(), "User registered");

        let token = issue_token(self.tokens.as_ref(), &user)?;
        Ok(AuthenticationResult {
            user_id: *user.id(),
            token,
        })
    }

    async fn persist(&self, uow: &mut UnitOfWork, user: &mut User) -> Outcome<usize> {
        if let Some(email) = user.email() {
            let existing = uow
                .users()
                .get_by_email(email)
                .await
                .map_err(persistence_failure)?;
            if existing.is_some() {
                return Err(UserError::already_exists(UniqueField::Email, email.as_str()).into());
            }
        }

        if let Some(username) = user.username() {
            let existing = uow
                .users()
                .get_by_username(username)
                .await
                .map_err(persistence_failure)?;
            if existing.is_some() {
                return Err(
                    UserError::already_exists(UniqueField::Username, username.as_str()).into(),
                );
            }
        }

        uow.users().create(user).await.map_err(persistence_failure)?;
        uow.collect_domain_events([&mut *user]);
        uow.commit().await.map_err(persistence_failure)
    }
}

/// A uniqueness clash found by storage is still a duplicate; anything
/// else means the user could not be created.
fn persistence_failure(err: InfrastructureError) -> ErrorDetail {
    if err.is_conflict() {
        return UserError::Duplicate.into();
    }
    error!(error = %err, "Failed to persist new user");
    UserError::create_failed(err.to_string()).into()
}
