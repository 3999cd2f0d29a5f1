//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod auth;

pub use auth::{
    // Commands and Results
    AuthenticationResult, LoginCommand, RegisterCommand, ValidateEmailCommand,
    // Handlers
    LoginHandler, RegisterHandler, SendValidationEmailHandler, ValidateEmailHandler,
};
