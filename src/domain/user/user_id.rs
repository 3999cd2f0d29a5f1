//! User identifier value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Uuid, Variant};

use super::UserError;
use crate::domain::foundation::Outcome;

/// Length of the hyphenated textual UUID form.
const HYPHENATED_LEN: usize = 36;

/// Unique identifier for a user; always a v4 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accepts a caller-supplied identifier or generates one when absent.
    ///
    /// A supplied value must be a hyphenated RFC 4122 version-4 UUID.
    pub fn create(value: Option<&str>) -> Outcome<Self> {
        match value.filter(|v| !v.is_empty()) {
            None => Ok(Self::generate()),
            Some(raw) => Self::parse_v4(raw).ok_or_else(|| UserError::InvalidId(raw.into()).into()),
        }
    }

    /// Wraps a UUID that storage already validated.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    fn parse_v4(raw: &str) -> Option<Self> {
        if raw.len() != HYPHENATED_LEN {
            return None;
        }
        Uuid::parse_str(raw)
            .ok()
            .filter(|uuid| uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122)
            .map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
