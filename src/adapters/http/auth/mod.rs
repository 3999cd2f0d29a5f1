//! HTTP adapter for authentication endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    meets_password_policy, AuthResponse, ErrorResponse, LoginRequest, RegisterRequest,
    ValidateEmailResponse,
};
pub use handlers::{error_response, AuthHandlers};
pub use routes::auth_routes;
