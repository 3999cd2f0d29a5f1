//! PostgreSQL implementation of UserReader.

use async_trait::async_trait;
use sqlx::PgPool;

use super::user_row::{row_to_user, USER_COLUMNS};
use crate::domain::foundation::InfrastructureError;
use crate::domain::user::{Email, User, UserId, Username};
use crate::ports::UserReader;

/// Pool-bound user lookups.
#[derive(Clone)]
pub struct PostgresUserReader {
    pool: PgPool,
}

impl PostgresUserReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<User>, InfrastructureError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| InfrastructureError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserReader for PostgresUserReader {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfrastructureError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| InfrastructureError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfrastructureError> {
        self.fetch_by("email", email.as_str()).await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError> {
        self.fetch_by("username", username.as_str()).await
    }
}
