//! Unit of Work - transaction boundary for aggregate writes and their events.
//!
//! A Unit of Work owns at most one open [`StorageTransaction`]. Aggregates
//! are written through [`UnitOfWork::users`], their pending events are
//! harvested with [`UnitOfWork::collect_domain_events`], and
//! [`UnitOfWork::commit`] appends those events to the outbox inside the
//! same transaction before committing it.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──► InTransaction ──commit──► Committed
//!                      │                        │
//!                      └─rollback / commit err─►RolledBack
//! Committed / RolledBack ──start──► InTransaction
//! ```
//!
//! Calling `users`, `collect_domain_events`, `commit` or `rollback` without
//! an open transaction is a programming error and panics. So does starting
//! a transaction while one is open. `rollback` on an already rolled-back
//! unit is a no-op.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::events::RegisteredEvent;
use crate::domain::foundation::{AggregateRoot, InfrastructureError};
use crate::ports::{OutboxRecord, StorageTransaction, TransactionFactory, UserRepository};

/// Lifecycle state of a [`UnitOfWork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    InTransaction,
    Committed,
    RolledBack,
}

/// One request's transaction scope.
pub struct UnitOfWork {
    factory: Arc<dyn TransactionFactory>,
    transaction: Option<Box<dyn StorageTransaction>>,
    pending: Vec<RegisteredEvent>,
    state: TransactionState,
}

impl UnitOfWork {
    pub fn new(factory: Arc<dyn TransactionFactory>) -> Self {
        Self {
            factory,
            transaction: None,
            pending: Vec::new(),
            state: TransactionState::Idle,
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Events collected so far in the current transaction.
    pub fn collected_events(&self) -> &[RegisteredEvent] {
        &self.pending
    }

    /// Open a storage transaction.
    ///
    /// # Panics
    ///
    /// If a transaction is already open.
    pub async fn start_transaction(&mut self) -> Result<(), InfrastructureError> {
        assert!(
            self.state != TransactionState::InTransaction,
            "UnitOfWork: start_transaction called while a transaction is already open"
        );

        let transaction = self.factory.begin().await?;
        self.transaction = Some(transaction);
        self.pending.clear();
        self.state = TransactionState::InTransaction;
        debug!("Unit of work started");
        Ok(())
    }

    /// User repository bound to the open transaction.
    ///
    /// # Panics
    ///
    /// If no transaction is open.
    pub fn users(&mut self) -> &mut dyn UserRepository {
        self.active_transaction("users").users()
    }

    /// Drain every aggregate's pending events into this unit.
    ///
    /// # Panics
    ///
    /// If no transaction is open.
    pub fn collect_domain_events<'a, A>(&mut self, aggregates: impl IntoIterator<Item = &'a mut A>)
    where
        A: AggregateRoot + 'a,
        A::Event: Into<RegisteredEvent>,
    {
        self.active_transaction("collect_domain_events");
        for aggregate in aggregates {
            self.pending
                .extend(aggregate.drain_events().into_iter().map(Into::into));
        }
    }

    /// Write collected events to the outbox and commit.
    ///
    /// Returns the number of outbox records written. On any failure the
    /// transaction is aborted, no outbox record survives, and the unit
    /// ends up `RolledBack`.
    ///
    /// # Panics
    ///
    /// If no transaction is open.
    pub async fn commit(&mut self) -> Result<usize, InfrastructureError> {
        let mut transaction = self.take_transaction("commit");
        let events = std::mem::take(&mut self.pending);

        let records = match events
            .iter()
            .map(OutboxRecord::from_event)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(records) => records,
            Err(err) => {
                self.abort(transaction).await;
                return Err(err.into());
            }
        };

        if !records.is_empty() {
            if let Err(err) = transaction.append_outbox(&records).await {
                self.abort(transaction).await;
                return Err(err);
            }
        }

        match transaction.commit().await {
            Ok(()) => {
                self.state = TransactionState::Committed;
                debug!(outbox_records = records.len(), "Unit of work committed");
                Ok(records.len())
            }
            Err(err) => {
                self.state = TransactionState::RolledBack;
                warn!(error = %err, "Unit of work commit failed");
                Err(err)
            }
        }
    }

    /// Abort the open transaction and discard collected events.
    ///
    /// No-op when already rolled back.
    ///
    /// # Panics
    ///
    /// If the unit is `Idle` or `Committed`.
    pub async fn rollback(&mut self) -> Result<(), InfrastructureError> {
        if self.state == TransactionState::RolledBack {
            return Ok(());
        }

        let transaction = self.take_transaction("rollback");
        self.pending.clear();
        self.state = TransactionState::RolledBack;
        debug!("Unit of work rolled back");
        transaction.rollback().await
    }

    fn active_transaction(&mut self, operation: &str) -> &mut Box<dyn StorageTransaction> {
        match self.transaction.as_mut() {
            Some(transaction) => transaction,
            None => panic!(
                "UnitOfWork: {} called without an open transaction (state {:?})",
                operation, self.state
            ),
        }
    }

    fn take_transaction(&mut self, operation: &str) -> Box<dyn StorageTransaction> {
        match self.transaction.take() {
            Some(transaction) => transaction,
            None => panic!(
                "UnitOfWork: {} called without an open transaction (state {:?})",
                operation, self.state
            ),
        }
    }

    async fn abort(&mut self, transaction: Box<dyn StorageTransaction>) {
        self.state = TransactionState::RolledBack;
        if let Err(err) = transaction.rollback().await {
            warn!(error = %err, "Rollback after failed commit also failed");
        }
    }
}
