//! User-specific error types.

use crate::domain::foundation::{ErrorCategory, ErrorDetail};

/// Unique user fields checked on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    fn label(&self) -> &'static str {
        match self {
            UniqueField::Email => "Email",
            UniqueField::Username => "Username",
        }
    }
}

/// User-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// Supplied identifier is not a v4 UUID.
    InvalidId(String),
    /// Email does not match the accepted grammar.
    InvalidEmail(String),
    /// Every username rule that was violated.
    InvalidUsername(Vec<String>),
    /// Password hash is empty.
    EmptyPasswordHash,
    /// Neither email nor username was supplied.
    CredentialsRequired,
    /// Another user already owns this email or username.
    AlreadyExists { field: UniqueField, value: String },
    /// Storage rejected the write as a uniqueness clash.
    Duplicate,
    /// No user matched the lookup.
    NotFound,
    /// Password did not match the stored hash.
    CredentialIncorrect,
    /// Registration could not be persisted.
    CreateFailed(String),
    /// A token could not be verified.
    InvalidToken,
}

impl UserError {
    pub fn already_exists(field: UniqueField, value: impl Into<String>) -> Self {
        UserError::AlreadyExists {
            field,
            value: value.into(),
        }
    }

    pub fn create_failed(message: impl Into<String>) -> Self {
        UserError::CreateFailed(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UserError::InvalidId(_) => ErrorCategory::UserExist,
            UserError::InvalidEmail(_) => ErrorCategory::UserExist,
            UserError::InvalidUsername(_) => ErrorCategory::UserUsername,
            UserError::EmptyPasswordHash => ErrorCategory::UserPassword,
            UserError::CredentialsRequired => ErrorCategory::UserRequired,
            UserError::AlreadyExists { .. } => ErrorCategory::UserExist,
            UserError::Duplicate => ErrorCategory::UserExist,
            UserError::NotFound => ErrorCategory::UserNotFound,
            UserError::CredentialIncorrect => ErrorCategory::CredentialIncorrect,
            UserError::CreateFailed(_) => ErrorCategory::UserCreate,
            UserError::InvalidToken => ErrorCategory::TokenInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            UserError::InvalidId(id) => format!("User ID \"{}\" is not a valid ID", id),
            UserError::InvalidEmail(email) => {
                format!("User Email \"{}\" is not a valid email", email)
            }
            UserError::InvalidUsername(reasons) => {
                format!("User Username is not valid: {}", reasons.join("; "))
            }
            UserError::EmptyPasswordHash => "Password hash cannot be empty".to_string(),
            UserError::CredentialsRequired => "Username or Email is required".to_string(),
            UserError::AlreadyExists { field, value } => {
                format!("User with {} '{}' already exists", field.label(), value)
            }
            UserError::Duplicate => {
                "User with this Email or Username already exists".to_string()
            }
            UserError::NotFound => "User does not Found".to_string(),
            UserError::CredentialIncorrect => "Credentials are incorrect".to_string(),
            UserError::CreateFailed(msg) => format!("Error while User create: {}", msg),
            UserError::InvalidToken => "Token is invalid or expired".to_string(),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<UserError> for ErrorDetail {
    fn from(err: UserError) -> Self {
        ErrorDetail::new(err.category(), err.message())
    }
}
