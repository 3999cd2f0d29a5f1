//! Domain events raised by the User aggregate.

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::domain::foundation::{EventId, Timestamp};

/// Raised once when a brand-new user is registered.
///
/// Carries only the identity; handlers reload the user to act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreated {
    pub event_id: EventId,
    pub user_id: UserId,
    pub occurred_at: Timestamp,
}

impl UserCreated {
    pub const EVENT_TYPE: &'static str = "user.created.v1";

    pub fn new(user_id: UserId) -> Self {
        Self {
            event_id: EventId::new(),
            user_id,
            occurred_at: Timestamp::now(),
        }
    }
}

crate::domain_event!(
    UserCreated,
    event_type = UserCreated::EVENT_TYPE,
    aggregate_id = user_id,
    occurred_at = occurred_at,
    event_id = event_id
);

/// Every event the User aggregate can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    Created(UserCreated),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainEvent;

    #[test]
    fn user_created_reports_its_metadata() {
        let user_id = UserId::generate();
        let event = UserCreated::new(user_id);

        assert_eq!(event.event_type(), "user.created.v1");
        assert_eq!(event.aggregate_id(), user_id.to_string());
    }

    #[test]
    fn user_created_payload_keeps_identity() {
        let event = UserCreated::new(UserId::generate());
        let json = serde_json::to_string(&event).unwrap();
        let back: UserCreated = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
