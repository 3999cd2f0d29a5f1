//! HTTP handlers for authentication endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{
    LoginCommand, LoginHandler, RegisterCommand, RegisterHandler, ValidateEmailCommand,
    ValidateEmailHandler,
};
use crate::domain::foundation::ErrorDetail;

use super::dto::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, ValidateEmailResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AuthHandlers {
    register_handler: Arc<RegisterHandler>,
    login_handler: Arc<LoginHandler>,
    validate_email_handler: Arc<ValidateEmailHandler>,
}

impl AuthHandlers {
    pub fn new(
        register_handler: Arc<RegisterHandler>,
        login_handler: Arc<LoginHandler>,
        validate_email_handler: Arc<ValidateEmailHandler>,
    ) -> Self {
        Self {
            register_handler,
            login_handler,
            validate_email_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /auth/register - Register a new user
pub async fn register(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(&e);
    }

    let cmd = RegisterCommand {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    match handlers.register_handler.handle(cmd).await {
        Ok(result) => (StatusCode::CREATED, Json(AuthResponse::from(result))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /auth/login - Exchange credentials for a token
pub async fn login(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<LoginRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return error_response(&e);
    }

    let cmd = LoginCommand {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    match handlers.login_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(AuthResponse::from(result))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /auth/validate-email/:token - Confirm an email address
pub async fn validate_email(
    State(handlers): State<AuthHandlers>,
    Path(token): Path<String>,
) -> Response {
    match handlers
        .validate_email_handler
        .handle(ValidateEmailCommand { token })
        .await
    {
        Ok(user_id) => {
            let response = ValidateEmailResponse {
                user_id: user_id.to_string(),
                message: "Email validated successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Renders a failure with the status its category hints at.
pub fn error_response(detail: &ErrorDetail) -> Response {
    let status =
        StatusCode::from_u16(detail.status_hint()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(category = %detail.category(), error = %detail.message(), "Request failed");
    }
    (status, Json(ErrorResponse::from(detail))).into_response()
}
