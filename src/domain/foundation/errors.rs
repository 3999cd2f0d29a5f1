//! Error types for the domain layer.
//!
//! Two vocabularies live here:
//!
//! - [`ErrorDetail`] - expected, recoverable failures (validation, not found,
//!   conflicts). These travel as the `Err` side of an
//!   [`Outcome`](super::Outcome) and are never raised as faults.
//! - [`InfrastructureError`] - storage or serialization faults raised by ports.
//!   Use-cases translate them into an `ErrorDetail` at their boundary.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Failure categories understood by every layer.
///
/// Each category maps to a fixed status hint that the HTTP boundary
/// turns into a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    // Validation and conflict errors
    UserExist,
    UserUsername,
    UserPassword,
    UserRequired,
    CredentialIncorrect,
    TokenInvalid,
    NullValue,
    RequestInvalid,

    // Not found errors
    UserNotFound,

    // Infrastructure errors
    UserCreate,
    Internal,
}

impl ErrorCategory {
    /// Returns the dotted category name carried on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserExist => "User.Exist",
            ErrorCategory::UserUsername => "User.Username",
            ErrorCategory::UserPassword => "User.Password",
            ErrorCategory::UserRequired => "User.Required",
            ErrorCategory::CredentialIncorrect => "Credential.Incorrect",
            ErrorCategory::TokenInvalid => "Token.Invalid",
            ErrorCategory::NullValue => "Error.NullValue",
            ErrorCategory::RequestInvalid => "Request.Invalid",
            ErrorCategory::UserNotFound => "User.Not.Found",
            ErrorCategory::UserCreate => "User.Create",
            ErrorCategory::Internal => "Error.Internal",
        }
    }

    /// Returns the status hint for this category.
    ///
    /// 400 for validation/conflict, 404 for not-found, 500 for
    /// unexpected or infrastructure failures.
    pub fn status_hint(&self) -> u16 {
        match self {
            ErrorCategory::UserNotFound => 404,
            ErrorCategory::UserCreate | ErrorCategory::Internal => 500,
            _ => 400,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed payload of a failed [`Outcome`](super::Outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    category: ErrorCategory,
    message: Cow<'static, str>,
    status_hint: u16,
}

impl ErrorDetail {
    /// Creates an error detail; the status hint follows the category.
    pub fn new(category: ErrorCategory, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            category,
            message: message.into(),
            status_hint: category.status_hint(),
        }
    }

    /// Failure produced when an optional value turned out to be absent.
    pub fn null_value() -> Self {
        Self::new(
            ErrorCategory::NullValue,
            "The specified result value is null",
        )
    }

    /// Generic failure for faults that must not leak their details.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_hint(&self) -> u16 {
        self.status_hint
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl Error for ErrorDetail {}

/// Faults raised by storage and serialization ports.
///
/// These are not domain outcomes: callers roll back and translate them.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl InfrastructureError {
    pub fn database(message: impl Into<String>) -> Self {
        InfrastructureError::Database(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        InfrastructureError::Conflict(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        InfrastructureError::Corrupt(message.into())
    }

    /// Returns true if the fault is a unique-constraint violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, InfrastructureError::Conflict(_))
    }
}
