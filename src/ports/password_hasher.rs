//! Password hashing port.

use crate::domain::foundation::AuthError;

/// One-way password digests.
///
/// Digests must be self-describing (algorithm and parameters embedded) so
/// `verify` needs nothing but the digest.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext secret.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Check a plaintext secret against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; `Err` means the digest is unreadable.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError>;
}
