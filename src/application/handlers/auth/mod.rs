//! Authentication handlers.
//!
//! - `RegisterHandler` - Create a user and queue its validation email
//! - `LoginHandler` - Exchange credentials for a token
//! - `ValidateEmailHandler` - Confirm an email from a validation link
//! - `SendValidationEmailHandler` - `UserCreated` consumer that mails the link

mod login;
mod register;
mod send_validation_email;
mod validate_email;

pub use login::{LoginCommand, LoginHandler};
pub use register::{AuthenticationResult, RegisterCommand, RegisterHandler};
pub use send_validation_email::{validation_link, SendValidationEmailHandler, VALIDATION_SUBJECT};
pub use validate_email::{ValidateEmailCommand, ValidateEmailHandler};

use tracing::error;

use crate::domain::foundation::{
    AggregateRoot, ErrorDetail, InfrastructureError, Outcome, TokenClaims,
};
use crate::domain::user::User;
use crate::ports::TokenService;

/// Issue a token for `user` carrying its current identity claims.
fn issue_token(tokens: &dyn TokenService, user: &User) -> Outcome<String> {
    let claims = TokenClaims::new(
        *user.id().as_uuid(),
        user.username().map(|u| u.as_str().to_string()),
        user.email().map(|e| e.as_str().to_string()),
    );
    tokens.issue(&claims).map_err(|e| {
        error!(user_id = %user.id(), error = %e, "Failed to issue token");
        ErrorDetail::internal(format!("Failed to issue token: {}", e))
    })
}

/// Run CPU-bound credential work (Argon2 hashing and verification) on the
/// blocking pool.
async fn off_runtime<T, F>(work: F) -> Outcome<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "Credential task failed");
        ErrorDetail::internal(format!("Credential task failed: {}", e))
    })
}

/// Re-express an infrastructure fault as an internal failure.
fn internal(err: InfrastructureError) -> ErrorDetail {
    error!(error = %err, "Infrastructure failure");
    ErrorDetail::internal(err.to_string())
}

/// Treat empty strings from the wire as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
