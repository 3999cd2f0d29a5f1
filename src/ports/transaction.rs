//! Storage transaction ports.
//!
//! A [`StorageTransaction`] is one open transaction in the backing store.
//! Aggregate writes (through [`StorageTransaction::users`]) and outbox
//! appends share it, so both land or neither does.

use async_trait::async_trait;

use super::{OutboxRecord, UserRepository};
use crate::domain::foundation::InfrastructureError;

/// One open transaction.
///
/// `commit` and `rollback` consume the transaction; dropping it without
/// either must abort.
#[async_trait]
pub trait StorageTransaction: Send {
    /// User repository bound to this transaction.
    fn users(&mut self) -> &mut dyn UserRepository;

    /// Append outbox records inside this transaction.
    async fn append_outbox(&mut self, records: &[OutboxRecord]) -> Result<(), InfrastructureError>;

    async fn commit(self: Box<Self>) -> Result<(), InfrastructureError>;

    async fn rollback(self: Box<Self>) -> Result<(), InfrastructureError>;
}

/// Opens storage transactions.
#[async_trait]
pub trait TransactionFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, InfrastructureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_ports_are_object_safe() {
        fn _accepts_factory(_factory: &dyn TransactionFactory) {}
        fn _accepts_tx(_tx: Box<dyn StorageTransaction>) {}
    }
}
