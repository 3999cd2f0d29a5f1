//! Authentication types for the domain layer.
//!
//! These types describe what a token carries and how token handling can
//! fail. They have **no signing dependencies** - any token adapter can
//! produce and consume them via the `TokenService` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims embedded in access and email-validation tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The user the token was issued for.
    pub user_id: Uuid,

    /// Username at issue time, if the user has one.
    pub username: Option<String>,

    /// Email at issue time, if the user has one.
    pub email: Option<String>,
}

impl TokenClaims {
    pub fn new(user_id: Uuid, username: Option<String>, email: Option<String>) -> Self {
        Self {
            user_id,
            username,
            email,
        }
    }
}

/// Errors that can occur while issuing or verifying tokens.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The token could not be signed.
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// A password digest could not be produced or parsed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Returns true if the caller presented a token that must be replaced.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_invalid_token_displays_correctly() {
        assert_eq!(format!("{}", AuthError::InvalidToken), "Invalid or expired token");
    }

    #[test]
    fn auth_error_requires_reauthentication_for_token_errors() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::Signing("bad key".to_string()).requires_reauthentication());
    }

    #[test]
    fn token_claims_round_trip_through_json() {
        let claims = TokenClaims::new(Uuid::new_v4(), Some("alice.smith".into()), None);
        let json = serde_json::to_string(&claims).unwrap();
        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
