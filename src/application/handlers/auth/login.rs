//! LoginHandler - Query handler exchanging credentials for a token.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::{internal, issue_token, non_empty, off_runtime, AuthenticationResult};
use crate::domain::foundation::{AggregateRoot, ErrorDetail, Outcome};
use crate::domain::user::{Email, User, UserError, Username};
use crate::ports::{PasswordHasher, TokenService, UserReader};

/// Credentials presented at login. Either identifier may be used.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Handler for logging users in.
pub struct LoginHandler {
    users: Arc<dyn UserReader>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserReader>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Outcome<AuthenticationResult> {
        let username = non_empty(cmd.username);
        let email = non_empty(cmd.email);
        if username.is_none() && email.is_none() {
            return Err(UserError::CredentialsRequired.into());
        }

        let user = self
            .lookup(email.as_deref(), username.as_deref())
            .await?
            .ok_or_else(|| {
                debug!("Login for unknown user");
                ErrorDetail::from(UserError::NotFound)
            })?;

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let digest = user.password_hash().as_str().to_string();
        let matches = off_runtime(move || hasher.verify(&password, &digest))
            .await?
            .map_err(|e| {
                error!(user_id = %user.id(), error = %e, "Password verification failed");
                ErrorDetail::internal(format!("Password verification failed: {}", e))
            })?;
        if !matches {
            info!(user_id = %user.id(), "Login rejected: incorrect credentials");
            return Err(UserError::CredentialIncorrect.into());
        }

        info!(user_id = %user.id(), "User logged in");

        let token = issue_token(self.tokens.as_ref(), &user)?;
        Ok(AuthenticationResult {
            user_id: *user.id(),
            token,
        })
    }

    /// Email wins when both are given; the username is only tried when the
    /// email matches nobody. Malformed identifiers match nobody.
    async fn lookup(&self, email: Option<&str>, username: Option<&str>) -> Outcome<Option<User>> {
        if let Some(Ok(Some(email))) = email.map(|raw| Email::create(Some(raw))) {
            if let Some(user) = self.users.find_by_email(&email).await.map_err(internal)? {
                return Ok(Some(user));
            }
        }

        if let Some(Ok(Some(username))) = username.map(|raw| Username::create(Some(raw))) {
            return self.users.find_by_username(&username).await.map_err(internal);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::auth::test_support::{
        FakeTokens, PlainHasher, ThreadRecordingHasher,
    };
    use crate::application::handlers::auth::{RegisterCommand, RegisterHandler};
    use crate::domain::foundation::{ErrorCategory, OutcomeExt};
    use crate::domain::user::UserId;

    async fn seeded() -> (InMemoryStore, UserId) {
        let store = InMemoryStore::new();
        let registered = RegisterHandler::new(
            Arc::new(store.clone()),
            Arc::new(PlainHasher),
            Arc::new(FakeTokens),
        )
        .handle(RegisterCommand {
            username: Some("alice.smith".to_string()),
            email: Some("alice@example.com".to_string()),
            password: "Sup3r!Secret".to_string(),
        })
        .await
        .value();
        (store, registered.user_id)
    }

    fn handler(store: &InMemoryStore) -> LoginHandler {
        LoginHandler::new(Arc::new(store.clone()), Arc::new(PlainHasher), Arc::new(FakeTokens))
    }

    fn by_email(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: None,
            email: Some(email.to_string()),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn logs_in_by_email() {
        let (store, user_id) = seeded().await;
        let result = handler(&store)
            .handle(by_email("alice@example.com", "Sup3r!Secret"))
            .await
            .value();

        assert_eq!(result.user_id, user_id);
        assert_eq!(result.token, format!("token:{}", user_id));
    }

    #[tokio::test]
    async fn verifies_password_off_the_async_thread() {
        let (store, _) = seeded().await;
        let hasher = Arc::new(ThreadRecordingHasher::default());
        let handler = LoginHandler::new(
            Arc::new(store.clone()),
            hasher.clone(),
            Arc::new(FakeTokens),
        );

        handler
            .handle(by_email("alice@example.com", "Sup3r!Secret"))
            .await
            .value();

        let threads = hasher.threads();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], std::thread::current().id());
    }

    #[tokio::test]
    async fn logs_in_by_username() {
        let (store, user_id) = seeded().await;
        let result = handler(&store)
            .handle(LoginCommand {
                username: Some("alice.smith".to_string()),
                email: None,
                password: "Sup3r!Secret".to_string(),
            })
            .await
            .value();

        assert_eq!(result.user_id, user_id);
    }

    #[tokio::test]
    async fn falls_back_to_username_when_email_is_unknown() {
        let (store, user_id) = seeded().await;
        let result = handler(&store)
            .handle(LoginCommand {
                username: Some("alice.smith".to_string()),
                email: Some("nobody@example.com".to_string()),
                password: "Sup3r!Secret".to_string(),
            })
            .await
            .value();

        assert_eq!(result.user_id, user_id);
    }

    #[tokio::test]
    async fn wrong_password_is_incorrect_credentials() {
        let (store, _) = seeded().await;
        let err = handler(&store)
            .handle(by_email("alice@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::CredentialIncorrect);
        assert_eq!(err.status_hint(), 400);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (store, _) = seeded().await;
        let err = handler(&store)
            .handle(by_email("bob@example.com", "Sup3r!Secret"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::UserNotFound);
        assert_eq!(err.message(), "User does not Found");
    }

    #[tokio::test]
    async fn malformed_email_is_not_found() {
        let (store, _) = seeded().await;
        let err = handler(&store)
            .handle(by_email("not-an-email", "Sup3r!Secret"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::UserNotFound);
    }

    #[tokio::test]
    async fn missing_identifiers_are_required() {
        let (store, _) = seeded().await;
        let err = handler(&store)
            .handle(LoginCommand {
                username: None,
                email: Some(String::new()),
                password: "Sup3r!Secret".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::UserRequired);
    }
}
