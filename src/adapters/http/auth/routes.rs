//! HTTP routes for authentication endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{login, register, validate_email, AuthHandlers};

/// Creates the auth router; mount it under `/auth`.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/validate-email/:token", get(validate_email))
        .with_state(handlers)
}
