//! Closed-world registry of every event that can travel through the outbox.
//!
//! Each persisted event carries a type tag. [`EventKind`] is the finite set
//! of known tags and [`RegisteredEvent`] is the decoded payload, so tag
//! resolution is an exhaustive match instead of a runtime lookup table.

use std::fmt;

use super::foundation::DomainEvent;
use super::user::{UserCreated, UserEvent};

/// Every event kind the outbox knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UserCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 1] = [EventKind::UserCreated];

    /// The tag stored alongside the payload.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::UserCreated => UserCreated::EVENT_TYPE,
        }
    }

    /// Resolves a stored tag; unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded event of one of the registered kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisteredEvent {
    UserCreated(UserCreated),
}

impl RegisteredEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RegisteredEvent::UserCreated(_) => EventKind::UserCreated,
        }
    }

    pub fn as_domain_event(&self) -> &dyn DomainEvent {
        match self {
            RegisteredEvent::UserCreated(event) => event,
        }
    }

    /// Serializes the payload for storage.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            RegisteredEvent::UserCreated(event) => serde_json::to_string(event),
        }
    }

    /// Deserializes a stored payload of the given kind.
    pub fn decode(kind: EventKind, payload: &str) -> Result<Self, serde_json::Error> {
        match kind {
            EventKind::UserCreated => serde_json::from_str(payload).map(Self::UserCreated),
        }
    }
}

impl From<UserEvent> for RegisteredEvent {
    fn from(event: UserEvent) -> Self {
        match event {
            UserEvent::Created(created) => RegisteredEvent::UserCreated(created),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    #[test]
    fn tags_resolve_to_kinds() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EventKind::from_tag("user.deleted.v1"), None);
    }

    #[test]
    fn encoded_payload_decodes_to_same_event() {
        let event = RegisteredEvent::from(UserEvent::Created(UserCreated::new(UserId::generate())));
        let payload = event.encode().unwrap();

        let decoded = RegisteredEvent::decode(event.kind(), &payload).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(
            decoded.as_domain_event().aggregate_id(),
            event.as_domain_event().aggregate_id()
        );
    }

    #[test]
    fn decode_rejects_malformed_payload() {
        assert!(RegisteredEvent::decode(EventKind::UserCreated, "{\"nope\":1}").is_err());
    }
}
