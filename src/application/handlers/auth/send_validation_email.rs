//! SendValidationEmailHandler - `UserCreated` consumer.
//!
//! Reloads the freshly created user, issues a validation token and mails
//! the validation link. Runs from the outbox dispatcher, so a failure here
//! only increments the record's attempt count.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{internal, issue_token};
use crate::domain::events::RegisteredEvent;
use crate::domain::foundation::{AggregateRoot, ErrorDetail};
use crate::domain::user::{UserCreated, UserError};
use crate::ports::{EmailSender, EventHandler, TokenService, UserReader};

pub const VALIDATION_SUBJECT: &str = "Validate your email";

/// Link the user follows to confirm their email.
pub fn validation_link(public_base_url: &str, token: &str) -> String {
    format!(
        "{}/auth/validate-email/{}",
        public_base_url.trim_end_matches('/'),
        token
    )
}

fn validation_body(link: &str, email: &str) -> String {
    format!(
        "<h1>Validate your email</h1>\
         <p>Click on the following link to validate your email</p>\
         <a href=\"{}\">Validate your email: {}</a>",
        link, email
    )
}

/// Sends the email-validation link for newly created users.
pub struct SendValidationEmailHandler {
    users: Arc<dyn UserReader>,
    tokens: Arc<dyn TokenService>,
    email: Arc<dyn EmailSender>,
    public_base_url: String,
}

impl SendValidationEmailHandler {
    pub fn new(
        users: Arc<dyn UserReader>,
        tokens: Arc<dyn TokenService>,
        email: Arc<dyn EmailSender>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            tokens,
            email,
            public_base_url: public_base_url.into(),
        }
    }

    async fn on_user_created(&self, event: &UserCreated) -> Result<(), ErrorDetail> {
        let user = self
            .users
            .find_by_id(&event.user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                warn!(user_id = %event.user_id, "Created user no longer exists");
                ErrorDetail::from(UserError::NotFound)
            })?;

        let Some(address) = user.email() else {
            info!(user_id = %user.id(), "User has no email, skipping validation email");
            return Ok(());
        };

        let token = issue_token(self.tokens.as_ref(), &user)?;
        let link = validation_link(&self.public_base_url, &token);
        let body = validation_body(&link, address.as_str());

        if !self
            .email
            .send(address.as_str(), VALIDATION_SUBJECT, &body)
            .await
        {
            return Err(ErrorDetail::internal(format!(
                "Validation email to user {} was not accepted",
                user.id()
            )));
        }

        info!(user_id = %user.id(), "Validation email sent");
        Ok(())
    }
}

#[async_trait]
impl EventHandler for SendValidationEmailHandler {
    async fn handle(&self, event: &RegisteredEvent) -> Result<(), ErrorDetail> {
        match event {
            RegisteredEvent::UserCreated(created) => self.on_user_created(created).await,
        }
    }

    fn name(&self) -> &'static str {
        "SendValidationEmail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::auth::test_support::{FakeTokens, PlainHasher};
    use crate::application::handlers::auth::{RegisterCommand, RegisterHandler};
    use crate::domain::foundation::{ErrorCategory, OutcomeExt};
    use crate::domain::user::UserId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingSender {
        accept: bool,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl CapturingSender {
        fn accepting() -> Self {
            Self {
                accept: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl EmailSender for CapturingSender {
        async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), html_body.to_string()));
            self.accept
        }
    }

    async fn register(store: &InMemoryStore, email: Option<&str>) -> UserId {
        RegisterHandler::new(
            Arc::new(store.clone()),
            Arc::new(PlainHasher),
            Arc::new(FakeTokens),
        )
        .handle(RegisterCommand {
            username: Some("alice.smith".to_string()),
            email: email.map(str::to_string),
            password: "Sup3r!Secret".to_string(),
        })
        .await
        .value()
        .user_id
    }

    fn handler(store: &InMemoryStore, sender: Arc<CapturingSender>) -> SendValidationEmailHandler {
        SendValidationEmailHandler::new(
            Arc::new(store.clone()),
            Arc::new(FakeTokens),
            sender,
            "https://auth.example.com/",
        )
    }

    fn created(user_id: UserId) -> RegisteredEvent {
        RegisteredEvent::UserCreated(UserCreated::new(user_id))
    }

    #[test]
    fn link_joins_base_url_and_token() {
        assert_eq!(
            validation_link("https://auth.example.com/", "abc"),
            "https://auth.example.com/auth/validate-email/abc"
        );
    }

    #[tokio::test]
    async fn sends_link_to_users_email() {
        let store = InMemoryStore::new();
        let user_id = register(&store, Some("alice@example.com")).await;
        let sender = Arc::new(CapturingSender::accepting());

        handler(&store, sender.clone())
            .handle(&created(user_id))
            .await
            .unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "alice@example.com");
        assert_eq!(subject, VALIDATION_SUBJECT);
        assert!(body.contains(&format!(
            "https://auth.example.com/auth/validate-email/token:{}",
            user_id
        )));
        assert!(body.contains("Validate your email: alice@example.com"));
    }

    #[tokio::test]
    async fn user_without_email_is_skipped() {
        let store = InMemoryStore::new();
        let user_id = register(&store, None).await;
        let sender = Arc::new(CapturingSender::accepting());

        handler(&store, sender.clone())
            .handle(&created(user_id))
            .await
            .unwrap();

        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_send_is_a_failure() {
        let store = InMemoryStore::new();
        let user_id = register(&store, Some("alice@example.com")).await;

        let err = handler(&store, Arc::new(CapturingSender::default()))
            .handle(&created(user_id))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[tokio::test]
    async fn missing_user_is_a_failure() {
        let store = InMemoryStore::new();
        let err = handler(&store, Arc::new(CapturingSender::accepting()))
            .handle(&created(UserId::generate()))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::UserNotFound);
    }
}
