//! Row mapping shared by the user repository and reader.

use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::foundation::InfrastructureError;
use crate::domain::user::{User, UserProperties};

pub(super) const USER_COLUMNS: &str = "id, username, email, password_hash, email_validated";

/// Rehydrate a `users` row. Never raises domain events.
pub(super) fn row_to_user(row: PgRow) -> Result<User, InfrastructureError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| InfrastructureError::corrupt(format!("Failed to read id: {}", e)))?;
    let username: Option<String> = row
        .try_get("username")
        .map_err(|e| InfrastructureError::corrupt(format!("Failed to read username: {}", e)))?;
    let email: Option<String> = row
        .try_get("email")
        .map_err(|e| InfrastructureError::corrupt(format!("Failed to read email: {}", e)))?;
    let password_hash: String = row.try_get("password_hash").map_err(|e| {
        InfrastructureError::corrupt(format!("Failed to read password_hash: {}", e))
    })?;
    let email_validated: bool = row.try_get("email_validated").map_err(|e| {
        InfrastructureError::corrupt(format!("Failed to read email_validated: {}", e))
    })?;

    User::create(UserProperties {
        id: Some(id.to_string()),
        username,
        email,
        password_hash,
        email_validated,
    })
    .map_err(|e| InfrastructureError::corrupt(format!("Stored user {} is invalid: {}", id, e)))
}

/// Map a write error, reporting unique violations as conflicts.
pub(super) fn map_write_error(e: sqlx::Error, context: &str) -> InfrastructureError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            InfrastructureError::conflict(format!("{}: {}", context, db_err.message()))
        }
        e => InfrastructureError::database(format!("{}: {}", context, e)),
    }
}
