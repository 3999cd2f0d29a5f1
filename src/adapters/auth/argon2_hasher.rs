//! Argon2id implementation of the PasswordHasher port.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...`), so the parameters
//! used to hash a password travel with it and `verify` keeps working
//! after the configured cost changes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};

use crate::domain::foundation::AuthError;
use crate::ports::PasswordHasher;

/// Argon2id password hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// `AuthError::Hashing` if the parameters are out of Argon2's range.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Hashing(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError> {
        let parsed = password_hash::PasswordHash::new(digest).map_err(|e| {
            tracing::warn!("Stored password digest is unreadable: {}", e);
            AuthError::Hashing(e.to_string())
        })?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}
