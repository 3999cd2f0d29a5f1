//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through a [`UnitOfWork`] so aggregate changes and their outbox
//! records commit together; reads go straight to the reader ports.

pub mod handlers;
pub mod unit_of_work;

pub use handlers::{
    AuthenticationResult, LoginCommand, LoginHandler, RegisterCommand, RegisterHandler,
    SendValidationEmailHandler, ValidateEmailCommand, ValidateEmailHandler,
};
pub use unit_of_work::{TransactionState, UnitOfWork};
