//! Token service port.
//!
//! Issues the bearer token returned on register/login and embedded in
//! email-validation links, and verifies tokens presented back to us.

use crate::domain::foundation::{AuthError, TokenClaims};

pub trait TokenService: Send + Sync {
    /// Sign a token carrying `claims`.
    fn issue(&self, claims: &TokenClaims) -> Result<String, AuthError>;

    /// Verify signature and expiry and return the embedded claims.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` if the token is past its expiry
    /// - `InvalidToken` for anything else that fails verification
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
