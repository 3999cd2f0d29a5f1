//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `TransactionFactory` / `StorageTransaction` - One storage transaction
//!   shared by aggregate writes and outbox appends
//! - `UserRepository` - Transaction-bound user persistence
//! - `UserReader` - Pool-bound user lookups
//! - `OutboxStore` - Fetch and mark outbox records for dispatch
//!
//! ## Event Ports
//!
//! - `EventHandler` - Side effect invoked for a dispatched event
//!
//! ## Credential & Notification Ports
//!
//! - `PasswordHasher` - One-way password digests
//! - `TokenService` - Issue and verify bearer tokens
//! - `EmailSender` - Outbound email transport

mod email_sender;
mod event_handler;
mod outbox_store;
mod password_hasher;
mod token_service;
mod transaction;
mod user_reader;
mod user_repository;

pub use email_sender::EmailSender;
pub use event_handler::EventHandler;
pub use outbox_store::{OutboxRecord, OutboxStore};
pub use password_hasher::PasswordHasher;
pub use token_service::TokenService;
pub use transaction::{StorageTransaction, TransactionFactory};
pub use user_reader::UserReader;
pub use user_repository::UserRepository;
