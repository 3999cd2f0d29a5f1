//! User aggregate.

use super::{Email, PasswordHash, UserCreated, UserEvent, UserId, Username};
use crate::domain::foundation::{AggregateRoot, Outcome, PendingEvents};

/// Raw, unvalidated input for building a [`User`].
///
/// Leaving `id` empty means "new user": an identity is generated and a
/// `UserCreated` event is raised. Supplying one rehydrates a stored user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProperties {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub email_validated: bool,
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: Option<Username>,
    email: Option<Email>,
    password_hash: PasswordHash,
    email_validated: bool,
    events: PendingEvents<UserEvent>,
}

impl User {
    /// Validates the properties and builds the aggregate.
    ///
    /// Fails on the first invalid field, checked in the order
    /// id, email, password hash, username.
    pub fn create(props: UserProperties) -> Outcome<Self> {
        let is_new = props.id.as_deref().map_or(true, str::is_empty);

        let id = UserId::create(props.id.as_deref())?;
        let email = Email::create(props.email.as_deref())?;
        let password_hash = PasswordHash::create(&props.password_hash)?;
        let username = Username::create(props.username.as_deref())?;

        let mut user = Self {
            id,
            username,
            email,
            password_hash,
            email_validated: props.email_validated,
            events: PendingEvents::new(),
        };

        if is_new {
            user.events.raise(UserEvent::Created(UserCreated::new(id)));
        }

        Ok(user)
    }

    /// Builds a brand-new user from registration input.
    pub fn register(
        username: Option<String>,
        email: Option<String>,
        password_hash: String,
    ) -> Outcome<Self> {
        Self::create(UserProperties {
            id: None,
            username,
            email,
            password_hash,
            email_validated: false,
        })
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn is_email_validated(&self) -> bool {
        self.email_validated
    }

    /// Marks the email as confirmed. Returns false if it already was.
    pub fn validate_email(&mut self) -> bool {
        if self.email_validated {
            return false;
        }
        self.email_validated = true;
        true
    }

    /// Converts back to raw properties for persistence.
    pub fn to_properties(&self) -> UserProperties {
        UserProperties {
            id: Some(self.id.to_string()),
            username: self.username.as_ref().map(|u| u.as_str().to_string()),
            email: self.email.as_ref().map(|e| e.as_str().to_string()),
            password_hash: self.password_hash.as_str().to_string(),
            email_validated: self.email_validated,
        }
    }
}

impl AggregateRoot for User {
    type Id = UserId;
    type Event = UserEvent;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn pending_events(&self) -> &[UserEvent] {
        self.events.as_slice()
    }

    fn drain_events(&mut self) -> Vec<UserEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCategory, OutcomeExt};

    fn alice() -> UserProperties {
        UserProperties {
            id: None,
            username: Some("alice.smith".into()),
            email: Some("alice@example.com".into()),
            password_hash: "$argon2id$digest".into(),
            email_validated: false,
        }
    }

    #[test]
    fn new_user_raises_exactly_one_created_event() {
        let mut user = User::create(alice()).value();
        assert_eq!(user.pending_events().len(), 1);

        let events = user.drain_events();
        assert_eq!(events.len(), 1);
        let UserEvent::Created(created) = &events[0];
        assert_eq!(created.user_id, *user.id());

        assert!(user.pending_events().is_empty());
        assert!(user.drain_events().is_empty());
    }

    #[test]
    fn rehydrated_user_raises_no_event() {
        let stored = User::create(alice()).value().to_properties();
        let user = User::create(stored.clone()).value();

        assert!(user.pending_events().is_empty());
        assert_eq!(user.id().to_string(), stored.id.unwrap());
    }

    #[test]
    fn empty_id_counts_as_new() {
        let user = User::create(UserProperties {
            id: Some(String::new()),
            ..alice()
        })
        .value();
        assert_eq!(user.pending_events().len(), 1);
    }

    #[test]
    fn email_is_checked_before_username() {
        let err = User::create(UserProperties {
            username: Some("_x".into()),
            email: Some("bogus".into()),
            ..alice()
        })
        .unwrap_err();
        assert!(err.message().contains("is not a valid email"));
    }

    #[test]
    fn password_hash_is_checked_before_username() {
        let err = User::create(UserProperties {
            username: Some("_x".into()),
            password_hash: String::new(),
            ..alice()
        })
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UserPassword);
    }

    #[test]
    fn invalid_id_fails_first() {
        let err = User::create(UserProperties {
            id: Some("nope".into()),
            email: Some("bogus".into()),
            ..alice()
        })
        .unwrap_err();
        assert!(err.message().contains("is not a valid ID"));
    }

    #[test]
    fn validate_email_is_idempotent() {
        let mut user = User::create(alice()).value();
        assert!(!user.is_email_validated());
        assert!(user.validate_email());
        assert!(!user.validate_email());
        assert!(user.is_email_validated());
    }
}
