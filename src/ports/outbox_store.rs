//! OutboxStore port - Read/mark side of the transactional outbox.
//!
//! Records are appended by a [`StorageTransaction`](super::StorageTransaction)
//! in the same transaction as the aggregate change they describe. This port
//! is what the dispatch job uses afterwards to find undelivered records and
//! record the result of each delivery attempt.
//!
//! ## Lifecycle
//!
//! 1. Unit of Work commits aggregate rows and outbox rows together
//! 2. The dispatcher fetches records with `delivered_at = NULL`
//! 3. Success sets `delivered_at`; failure bumps `attempts` and keeps the error
//!
//! Records are never deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::RegisteredEvent;
use crate::domain::foundation::InfrastructureError;

/// A persisted domain event awaiting (or past) delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub id: Uuid,

    /// Tag resolved to an `EventKind` at dispatch time
    pub type_tag: String,

    /// Serialized event payload
    pub payload_json: String,

    pub created_at: DateTime<Utc>,

    /// Set once the event was handled; `None` means eligible for dispatch
    pub delivered_at: Option<DateTime<Utc>>,

    /// Number of failed delivery attempts
    pub attempts: u32,

    /// Error from the most recent failed attempt
    pub last_error: Option<String>,
}

impl OutboxRecord {
    /// Create a new undelivered record.
    pub fn new(type_tag: impl Into<String>, payload_json: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_tag: type_tag.into(),
            payload_json: payload_json.into(),
            created_at: Utc::now(),
            delivered_at: None,
            attempts: 0,
            last_error: None,
        }
    }

    /// Serialize a registered event into a new record.
    ///
    /// The record takes the event's id and occurrence time, so the outbox
    /// preserves the order in which aggregates raised their events.
    pub fn from_event(event: &RegisteredEvent) -> Result<Self, serde_json::Error> {
        let meta = event.as_domain_event();
        Ok(Self {
            id: *meta.event_id().as_uuid(),
            created_at: *meta.occurred_at().as_datetime(),
            ..Self::new(event.kind().tag(), event.encode()?)
        })
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    /// Mark delivered. Returns false, leaving the record untouched, if it
    /// was already delivered.
    pub fn mark_delivered(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_delivered() {
            return false;
        }
        self.delivered_at = Some(at);
        true
    }

    /// Record a failed delivery attempt.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.attempts += 1;
        self.last_error = Some(error.into());
    }
}

/// Port used by the dispatch job to drive outbox delivery.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Fetch undelivered records, oldest first.
    ///
    /// `limit` bounds the batch; `None` returns all of them.
    /// When `max_attempts` is set, records that already failed that many
    /// times are skipped.
    async fn fetch_undelivered(
        &self,
        limit: Option<u32>,
        max_attempts: Option<u32>,
    ) -> Result<Vec<OutboxRecord>, InfrastructureError>;

    /// Set `delivered_at` on a record that is still undelivered.
    ///
    /// Returns false if the record was missing or already delivered.
    async fn mark_delivered(&self, id: Uuid, at: DateTime<Utc>)
        -> Result<bool, InfrastructureError>;

    /// Increment `attempts` and store `error` as `last_error`.
    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), InfrastructureError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::EventKind;
    use crate::domain::user::{UserCreated, UserId};

    #[test]
    fn new_record_is_undelivered() {
        let record = OutboxRecord::new("user.created.v1", "{}");
        assert!(!record.is_delivered());
        assert_eq!(record.attempts, 0);
        assert!(record.last_error.is_none());
    }

    #[test]
    fn mark_delivered_only_once() {
        let mut record = OutboxRecord::new("user.created.v1", "{}");
        let first = Utc::now();

        assert!(record.mark_delivered(first));
        assert!(!record.mark_delivered(Utc::now()));
        assert_eq!(record.delivered_at, Some(first));
    }

    #[test]
    fn record_failure_counts_attempts() {
        let mut record = OutboxRecord::new("user.created.v1", "{}");

        record.record_failure("smtp timeout");
        record.record_failure("smtp refused");

        assert_eq!(record.attempts, 2);
        assert_eq!(record.last_error.as_deref(), Some("smtp refused"));
        assert!(!record.is_delivered());
    }

    #[test]
    fn from_event_uses_kind_tag_and_payload() {
        let event = RegisteredEvent::UserCreated(UserCreated::new(UserId::generate()));
        let record = OutboxRecord::from_event(&event).unwrap();

        assert_eq!(record.type_tag, EventKind::UserCreated.tag());
        let RegisteredEvent::UserCreated(created) = &event;
        assert_eq!(record.id, *created.event_id.as_uuid());
        let decoded =
            RegisteredEvent::decode(EventKind::UserCreated, &record.payload_json).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn outbox_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn OutboxStore) {}
    }
}
