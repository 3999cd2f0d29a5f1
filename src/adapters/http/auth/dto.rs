//! HTTP DTOs for authentication endpoints.
//!
//! Request DTOs carry their own shape checks; everything deeper is decided
//! by the use-cases.

use serde::{Deserialize, Serialize};

use crate::application::AuthenticationResult;
use crate::domain::foundation::{ErrorCategory, ErrorDetail};
use crate::domain::user::Email;

/// Characters that satisfy the special-character password rule.
const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LENGTH: usize = 6;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to register a new user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Checks email syntax, the password policy and the confirmation.
    pub fn validate(&self) -> Result<(), ErrorDetail> {
        let mut problems = Vec::new();

        check_email(self.email.as_deref(), &mut problems);
        if !meets_password_policy(&self.password) {
            problems.push(
                "password must be at least 6 characters and contain a lowercase letter, \
                 an uppercase letter, a digit and one of @$!%*?&"
                    .to_string(),
            );
        }
        if self.password != self.confirm_password {
            problems.push("confirm_password must match password".to_string());
        }

        into_result(problems)
    }
}

/// Request to log in with an email or username.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ErrorDetail> {
        let mut problems = Vec::new();

        check_email(self.email.as_deref(), &mut problems);
        if self.password.is_empty() {
            problems.push("password is required".to_string());
        }

        into_result(problems)
    }
}

fn check_email(email: Option<&str>, problems: &mut Vec<String>) {
    if let Some(raw) = email.filter(|e| !e.is_empty()) {
        if Email::create(Some(raw)).is_err() {
            problems.push("email must be a valid email address".to_string());
        }
    }
}

fn into_result(problems: Vec<String>) -> Result<(), ErrorDetail> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ErrorDetail::new(
            ErrorCategory::RequestInvalid,
            problems.join("; "),
        ))
    }
}

/// At least six characters drawn from letters, digits and `@$!%*?&`, with
/// at least one of each class.
pub fn meets_password_policy(password: &str) -> bool {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));

    allowed
        && password.chars().count() >= PASSWORD_MIN_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
}

impl From<AuthenticationResult> for AuthResponse {
    fn from(result: AuthenticationResult) -> Self {
        Self {
            user_id: result.user_id.to_string(),
            token: result.token,
        }
    }
}

/// Response for a validated email.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateEmailResponse {
    pub user_id: String,
    pub message: String,
}

/// Error body: `{ "type": <category>, "error": <message> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: String,
}

impl From<&ErrorDetail> for ErrorResponse {
    fn from(detail: &ErrorDetail) -> Self {
        Self {
            error_type: detail.category().as_str().to_string(),
            error: detail.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some("alice.smith".into()),
            email: Some("alice@example.com".into()),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn password_policy_accepts_strong_password() {
        assert!(meets_password_policy("Sup3r!Secret"));
        assert!(meets_password_policy("aB3$xy"));
    }

    #[test]
    fn password_policy_rejects_missing_classes() {
        assert!(!meets_password_policy("sup3r!secret"));
        assert!(!meets_password_policy("SUP3R!SECRET"));
        assert!(!meets_password_policy("Super!Secret"));
        assert!(!meets_password_policy("Sup3rSecret"));
        assert!(!meets_password_policy("aB3$x"));
    }

    #[test]
    fn password_policy_rejects_other_characters() {
        assert!(!meets_password_policy("Sup3r!Secret#"));
        assert!(!meets_password_policy("Sup3r! Secret"));
    }

    #[test]
    fn valid_register_request_passes() {
        assert!(register("Sup3r!Secret", "Sup3r!Secret").validate().is_ok());
    }

    #[test]
    fn mismatched_confirmation_is_invalid() {
        let err = register("Sup3r!Secret", "Sup3r!SecreT").validate().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::RequestInvalid);
        assert!(err.message().contains("confirm_password"));
    }

    #[test]
    fn reports_every_problem() {
        let req = RegisterRequest {
            email: Some("nope".into()),
            ..register("weak", "other")
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.message().split("; ").count(), 3);
    }

    #[test]
    fn accepts_camel_case_confirmation() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"alice@example.com","password":"Sup3r!Secret","confirmPassword":"Sup3r!Secret"}"#,
        )
        .unwrap();
        assert_eq!(req.confirm_password, "Sup3r!Secret");
        assert!(req.username.is_none());
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            username: Some("alice.smith".into()),
            ..LoginRequest::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn error_response_uses_category_name() {
        let detail = ErrorDetail::new(ErrorCategory::UserNotFound, "User does not Found");
        let body = serde_json::to_value(ErrorResponse::from(&detail)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "type": "User.Not.Found", "error": "User does not Found" })
        );
    }
}
