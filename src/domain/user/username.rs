//! Username value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserError;
use crate::domain::foundation::Outcome;

pub const MIN_LENGTH: usize = 5;
pub const MAX_LENGTH: usize = 30;

const LENGTH_RULE: &str = "Username must be between 5 and 30 characters long";
const CONSECUTIVE_RULE: &str = "Username cannot have consecutive special characters like _ or .";
const EDGE_RULE: &str = "Username cannot start or end with special characters like _ or .";
const CHARSET_RULE: &str =
    "Username can only contain alphanumeric characters, underscores, and dots";

/// A username that satisfies every naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validates an optional username. Absent or empty input yields `Ok(None)`.
    ///
    /// All violated rules are reported together, not just the first.
    pub fn create(value: Option<&str>) -> Outcome<Option<Self>> {
        let Some(raw) = value.filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let violations = Self::violations(raw);
        if violations.is_empty() {
            Ok(Some(Self(raw.to_string())))
        } else {
            Err(UserError::InvalidUsername(violations).into())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn violations(raw: &str) -> Vec<String> {
        let mut reasons = Vec::new();

        let length = raw.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            reasons.push(LENGTH_RULE.to_string());
        }

        let chars: Vec<char> = raw.chars().collect();
        if chars.windows(2).any(|pair| is_special(pair[0]) && is_special(pair[1])) {
            reasons.push(CONSECUTIVE_RULE.to_string());
        }

        let starts_special = chars.first().is_some_and(|c| is_special(*c));
        let ends_special = chars.last().is_some_and(|c| is_special(*c));
        if starts_special || ends_special {
            reasons.push(EDGE_RULE.to_string());
        }

        if !chars.iter().all(|c| c.is_ascii_alphanumeric() || is_special(*c)) {
            reasons.push(CHARSET_RULE.to_string());
        }

        reasons
    }
}

fn is_special(c: char) -> bool {
    c == '_' || c == '.'
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCategory, OutcomeExt};
    use proptest::prelude::*;

    #[test]
    fn absent_or_empty_is_none() {
        assert_eq!(Username::create(None).value(), None);
        assert_eq!(Username::create(Some("")).value(), None);
    }

    #[test]
    fn accepts_valid_names() {
        for raw in ["alice", "alice.smith", "bob_the_builder", "a1b2c3"] {
            assert_eq!(Username::create(Some(raw)).value().unwrap().as_str(), raw);
        }
    }

    #[test]
    fn short_name_reports_length() {
        let err = Username::create(Some("abc")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UserUsername);
        assert_eq!(err.message(), format!("User Username is not valid: {}", LENGTH_RULE));
    }

    #[test]
    fn reports_every_violated_rule() {
        let err = Username::create(Some("._a")).unwrap_err();
        assert_eq!(
            err.message(),
            format!(
                "User Username is not valid: {}; {}; {}",
                LENGTH_RULE, CONSECUTIVE_RULE, EDGE_RULE
            )
        );
    }

    #[test]
    fn leading_separator_and_short_length_are_both_reported() {
        let err = Username::create(Some("_ab")).unwrap_err();
        assert!(err.message().contains(LENGTH_RULE));
        assert!(err.message().contains(EDGE_RULE));
        assert!(!err.message().contains(CONSECUTIVE_RULE));
    }

    #[test]
    fn rejects_disallowed_characters() {
        let err = Username::create(Some("alice-smith")).unwrap_err();
        assert!(err.message().contains(CHARSET_RULE));
        assert!(!err.message().contains(LENGTH_RULE));
    }

    #[test]
    fn rejects_trailing_special_character() {
        let err = Username::create(Some("alice_")).unwrap_err();
        assert!(err.message().contains(EDGE_RULE));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "a".repeat(MAX_LENGTH + 1);
        assert!(Username::create(Some(&name)).is_failure());
        let name = "a".repeat(MAX_LENGTH);
        assert!(Username::create(Some(&name)).is_success());
    }

    proptest! {
        #[test]
        fn alphanumeric_names_of_valid_length_are_accepted(raw in "[a-zA-Z0-9]{5,30}") {
            prop_assert!(Username::create(Some(&raw)).is_success());
        }

        #[test]
        fn names_longer_than_max_are_rejected(raw in "[a-zA-Z0-9]{31,60}") {
            prop_assert!(Username::create(Some(&raw)).is_failure());
        }
    }
}
