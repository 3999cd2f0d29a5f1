//! In-Memory Store Adapter
//!
//! One shared store implementing every persistence port. Writes made
//! inside a transaction are staged and only applied on commit, so a
//! rolled-back transaction leaves no trace.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::InfrastructureError;
use crate::domain::user::{Email, User, UserId, UserProperties, Username};
use crate::ports::{
    OutboxRecord, OutboxStore, StorageTransaction, TransactionFactory, UserReader, UserRepository,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<UserProperties>,
    outbox: Vec<OutboxRecord>,
}

#[derive(Debug, Default)]
struct FailurePlan {
    user_writes: AtomicBool,
    outbox_writes: AtomicBool,
}

/// In-memory storage for users and outbox records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    failures: Arc<FailurePlan>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent user create/update fail with a database error.
    pub fn fail_user_writes(&self, fail: bool) {
        self.failures.user_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent outbox append fail with a database error.
    pub fn fail_outbox_writes(&self, fail: bool) {
        self.failures.outbox_writes.store(fail, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Number of committed users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Snapshot of every outbox record in insertion order.
    pub async fn outbox_records(&self) -> Vec<OutboxRecord> {
        self.state.read().await.outbox.clone()
    }
}

fn rehydrate(props: &UserProperties) -> Result<User, InfrastructureError> {
    User::create(props.clone())
        .map_err(|err| InfrastructureError::corrupt(format!("stored user is invalid: {}", err)))
}

fn find<'a>(
    users: impl Iterator<Item = &'a UserProperties>,
    predicate: impl Fn(&UserProperties) -> bool,
) -> Option<&'a UserProperties> {
    users.filter(|props| predicate(props)).last()
}

/// Describes the uniqueness clash between `candidate` and `existing`, if any.
fn clash(candidate: &UserProperties, existing: &UserProperties) -> Option<String> {
    if candidate.id == existing.id {
        return None;
    }
    if candidate.email.is_some() && candidate.email == existing.email {
        return Some(format!("email {:?} is taken", candidate.email));
    }
    if candidate.username.is_some() && candidate.username == existing.username {
        return Some(format!("username {:?} is taken", candidate.username));
    }
    None
}

#[async_trait]
impl TransactionFactory for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, InfrastructureError> {
        Ok(Box::new(InMemoryTransaction {
            store: self.clone(),
            staged_users: Vec::new(),
            staged_outbox: Vec::new(),
        }))
    }
}

/// A staged transaction over [`InMemoryStore`].
pub struct InMemoryTransaction {
    store: InMemoryStore,
    staged_users: Vec<UserProperties>,
    staged_outbox: Vec<OutboxRecord>,
}

impl InMemoryTransaction {
    /// Committed users overlaid with this transaction's staged writes.
    async fn lookup(
        &self,
        predicate: impl Fn(&UserProperties) -> bool,
    ) -> Result<Option<User>, InfrastructureError> {
        if let Some(staged) = find(self.staged_users.iter(), &predicate) {
            return rehydrate(staged).map(Some);
        }
        let state = self.store.state.read().await;
        find(state.users.iter(), &predicate).map(rehydrate).transpose()
    }

    fn check_user_writes(&self) -> Result<(), InfrastructureError> {
        if self.store.failures.user_writes.load(Ordering::SeqCst) {
            return Err(InfrastructureError::database("simulated user write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryTransaction {
    async fn get_by_id(&mut self, id: &UserId) -> Result<Option<User>, InfrastructureError> {
        let id = Some(id.to_string());
        self.lookup(|props| props.id == id).await
    }

    async fn get_by_email(&mut self, email: &Email) -> Result<Option<User>, InfrastructureError> {
        self.lookup(|props| props.email.as_deref() == Some(email.as_str()))
            .await
    }

    async fn get_by_username(
        &mut self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError> {
        self.lookup(|props| props.username.as_deref() == Some(username.as_str()))
            .await
    }

    async fn create(&mut self, user: &User) -> Result<(), InfrastructureError> {
        self.check_user_writes()?;
        let props = user.to_properties();

        let state = self.store.state.read().await;
        if let Some(reason) = state
            .users
            .iter()
            .chain(self.staged_users.iter())
            .find_map(|existing| {
                if existing.id == props.id {
                    Some("id is taken".to_string())
                } else {
                    clash(&props, existing)
                }
            })
        {
            return Err(InfrastructureError::conflict(reason));
        }
        drop(state);

        self.staged_users.push(props);
        Ok(())
    }

    async fn update(&mut self, user: &User) -> Result<(), InfrastructureError> {
        self.check_user_writes()?;
        let props = user.to_properties();
        if self.lookup(|existing| existing.id == props.id).await?.is_none() {
            return Err(InfrastructureError::database(format!(
                "user {} does not exist",
                user_id_of(&props)
            )));
        }
        self.staged_users.push(props);
        Ok(())
    }
}

fn user_id_of(props: &UserProperties) -> &str {
    props.id.as_deref().unwrap_or_default()
}

#[async_trait]
impl StorageTransaction for InMemoryTransaction {
    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    async fn append_outbox(&mut self, records: &[OutboxRecord]) -> Result<(), InfrastructureError> {
        if self.store.failures.outbox_writes.load(Ordering::SeqCst) {
            return Err(InfrastructureError::database("simulated outbox write failure"));
        }
        self.staged_outbox.extend_from_slice(records);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), InfrastructureError> {
        let this = *self;
        let mut state = this.store.state.write().await;

        // Re-check uniqueness against anything committed since staging.
        for props in &this.staged_users {
            if let Some(reason) = state.users.iter().find_map(|existing| clash(props, existing)) {
                return Err(InfrastructureError::conflict(reason));
            }
        }

        for props in this.staged_users {
            match state.users.iter_mut().find(|existing| existing.id == props.id) {
                Some(existing) => *existing = props,
                None => state.users.push(props),
            }
        }
        state.outbox.extend(this.staged_outbox);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), InfrastructureError> {
        Ok(())
    }
}

#[async_trait]
impl UserReader for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfrastructureError> {
        let id = Some(id.to_string());
        let state = self.state.read().await;
        find(state.users.iter(), |props| props.id == id)
            .map(rehydrate)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfrastructureError> {
        let state = self.state.read().await;
        find(state.users.iter(), |props| {
            props.email.as_deref() == Some(email.as_str())
        })
        .map(rehydrate)
        .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError> {
        let state = self.state.read().await;
        find(state.users.iter(), |props| {
            props.username.as_deref() == Some(username.as_str())
        })
        .map(rehydrate)
        .transpose()
    }
}

#[async_trait]
impl OutboxStore for InMemoryStore {
    async fn fetch_undelivered(
        &self,
        limit: Option<u32>,
        max_attempts: Option<u32>,
    ) -> Result<Vec<OutboxRecord>, InfrastructureError> {
        let state = self.state.read().await;
        let mut records: Vec<OutboxRecord> = state
            .outbox
            .iter()
            .filter(|record| !record.is_delivered())
            .filter(|record| max_attempts.map_or(true, |max| record.attempts < max))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        if let Some(limit) = limit {
            records.truncate(limit as usize);
        }
        Ok(records)
    }

    async fn mark_delivered(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, InfrastructureError> {
        let mut state = self.state.write().await;
        Ok(state
            .outbox
            .iter_mut()
            .find(|record| record.id == id)
            .map_or(false, |record| record.mark_delivered(at)))
    }

    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), InfrastructureError> {
        let mut state = self.state.write().await;
        match state.outbox.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.record_failure(error);
                Ok(())
            }
            None => Err(InfrastructureError::database(format!(
                "outbox record {} not found",
                id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AggregateRoot, OutcomeExt};

    fn user(username: &str, email: &str) -> User {
        User::register(Some(username.into()), Some(email.into()), "digest".into()).value()
    }

    async fn insert(store: &InMemoryStore, user: &User) -> Result<(), InfrastructureError> {
        let mut tx = store.begin().await?;
        tx.users().create(user).await?;
        tx.commit().await
    }

    #[tokio::test]
    async fn committed_user_is_readable() {
        let store = InMemoryStore::new();
        let alice = user("alice.smith", "alice@example.com");
        insert(&store, &alice).await.unwrap();

        let email = Email::create(Some("alice@example.com")).value().unwrap();
        let found = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id(), alice.id());
        assert!(found.pending_events().is_empty());
    }

    #[tokio::test]
    async fn rolled_back_writes_are_discarded() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.users()
            .create(&user("alice.smith", "alice@example.com"))
            .await
            .unwrap();
        tx.append_outbox(&[OutboxRecord::new("user.created.v1", "{}")])
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.user_count().await, 0);
        assert!(store.outbox_records().await.is_empty());
    }

    #[tokio::test]
    async fn transaction_reads_its_own_writes() {
        let store = InMemoryStore::new();
        let alice = user("alice.smith", "alice@example.com");
        let mut tx = store.begin().await.unwrap();
        tx.users().create(&alice).await.unwrap();

        let found = tx.users().get_by_id(alice.id()).await.unwrap();
        assert!(found.is_some());
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryStore::new();
        insert(&store, &user("alice.smith", "alice@example.com"))
            .await
            .unwrap();

        let err = insert(&store, &user("alice.jones", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn concurrent_duplicate_is_caught_on_commit() {
        let store = InMemoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first
            .users()
            .create(&user("alice.smith", "alice@example.com"))
            .await
            .unwrap();
        second
            .users()
            .create(&user("alice.jones", "alice@example.com"))
            .await
            .unwrap();

        first.commit().await.unwrap();
        assert!(second.commit().await.unwrap_err().is_conflict());
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn update_replaces_committed_state() {
        let store = InMemoryStore::new();
        let alice = user("alice.smith", "alice@example.com");
        insert(&store, &alice).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let mut loaded = tx.users().get_by_id(alice.id()).await.unwrap().unwrap();
        loaded.validate_email();
        tx.users().update(&loaded).await.unwrap();
        tx.commit().await.unwrap();

        let stored = store.find_by_id(alice.id()).await.unwrap().unwrap();
        assert!(stored.is_email_validated());
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_database_errors() {
        let store = InMemoryStore::new();
        store.fail_user_writes(true);
        let err = insert(&store, &user("alice.smith", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, InfrastructureError::Database(_)));
    }

    #[tokio::test]
    async fn fetch_skips_delivered_and_exhausted_records() {
        let store = InMemoryStore::new();
        let records = vec![
            OutboxRecord::new("user.created.v1", "1"),
            OutboxRecord::new("user.created.v1", "2"),
            OutboxRecord::new("user.created.v1", "3"),
        ];
        let mut tx = store.begin().await.unwrap();
        tx.append_outbox(&records).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.mark_delivered(records[0].id, Utc::now()).await.unwrap());
        store.record_failure(records[1].id, "boom").await.unwrap();

        let all = store.fetch_undelivered(None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, records[1].id);

        let bounded = store.fetch_undelivered(None, Some(1)).await.unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].id, records[2].id);

        let limited = store.fetch_undelivered(Some(1), None).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn fetch_returns_oldest_first_regardless_of_insert_order() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let mut newest = OutboxRecord::new("user.created.v1", "newest");
        newest.created_at = now - chrono::Duration::minutes(1);
        let mut oldest = OutboxRecord::new("user.created.v1", "oldest");
        oldest.created_at = now - chrono::Duration::minutes(3);
        let mut middle = OutboxRecord::new("user.created.v1", "middle");
        middle.created_at = now - chrono::Duration::minutes(2);

        let mut tx = store.begin().await.unwrap();
        tx.append_outbox(&[newest.clone(), oldest.clone(), middle.clone()])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let fetched: Vec<Uuid> = store
            .fetch_undelivered(None, None)
            .await
            .unwrap()
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(fetched, vec![oldest.id, middle.id, newest.id]);

        let first = store.fetch_undelivered(Some(1), None).await.unwrap();
        assert_eq!(first[0].id, oldest.id);
    }

    #[tokio::test]
    async fn mark_delivered_is_only_applied_once() {
        let store = InMemoryStore::new();
        let record = OutboxRecord::new("user.created.v1", "{}");
        let mut tx = store.begin().await.unwrap();
        tx.append_outbox(std::slice::from_ref(&record)).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.mark_delivered(record.id, Utc::now()).await.unwrap());
        assert!(!store.mark_delivered(record.id, Utc::now()).await.unwrap());
        assert!(!store.mark_delivered(Uuid::new_v4(), Utc::now()).await.unwrap());
    }
}
