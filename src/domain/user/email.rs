//! Email value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserError;
use crate::domain::foundation::Outcome;

/// Shortest accepted top-level domain.
const TLD_MIN: usize = 2;
/// Longest accepted top-level domain.
const TLD_MAX: usize = 6;

/// A syntactically valid email address.
///
/// Accepted shape: `local@domain.tld` where `local` is letters, digits,
/// `.`, `_` or `-`; `domain` is letters, digits, `.` or `-`; and `tld`
/// is 2 to 6 ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validates an optional email. Absent or empty input yields `Ok(None)`.
    pub fn create(value: Option<&str>) -> Outcome<Option<Self>> {
        match value.filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(raw) if Self::is_well_formed(raw) => Ok(Some(Self(raw.to_string()))),
            Some(raw) => Err(UserError::InvalidEmail(raw.into()).into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn is_well_formed(raw: &str) -> bool {
        let Some((local, domain)) = raw.split_once('@') else {
            return false;
        };
        let Some((host, tld)) = domain.rsplit_once('.') else {
            return false;
        };

        !local.is_empty()
            && local.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && !host.is_empty()
            && host.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
            && (TLD_MIN..=TLD_MAX).contains(&tld.len())
            && tld.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
