//! Password hash value object.

use std::fmt;

use super::UserError;
use crate::domain::foundation::Outcome;

/// An opaque, non-empty password digest.
///
/// Never holds plaintext. `Debug` is redacted so digests stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn create(value: &str) -> Outcome<Self> {
        if value.is_empty() {
            return Err(UserError::EmptyPasswordHash.into());
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCategory, OutcomeExt};

    #[test]
    fn rejects_empty_digest() {
        let err = PasswordHash::create("").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UserPassword);
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::create("$argon2id$v=19$secret").value();
        assert_eq!(format!("{:?}", hash), "PasswordHash(***)");
        assert_eq!(hash.as_str(), "$argon2id$v=19$secret");
    }
}
