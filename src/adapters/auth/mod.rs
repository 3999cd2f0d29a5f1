//! Credential adapters.
//!
//! - `Argon2PasswordHasher` - Argon2id `PasswordHasher`
//! - `JwtTokenService` - HS256 `TokenService`

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::JwtTokenService;
