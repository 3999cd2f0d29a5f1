//! PostgreSQL storage transaction.
//!
//! One `sqlx` transaction carries both the user writes and the outbox
//! inserts of a Unit of Work. Dropping it uncommitted rolls back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::user_row::{map_write_error, row_to_user, USER_COLUMNS};
use crate::domain::foundation::{AggregateRoot, InfrastructureError};
use crate::domain::user::{Email, User, UserId, Username};
use crate::ports::{
    OutboxRecord, StorageTransaction, TransactionFactory, UserRepository,
};

/// Column values written for a user, bound as `$1..$5`.
#[derive(Debug, PartialEq)]
struct UserParams<'a> {
    id: &'a Uuid,
    username: Option<&'a str>,
    email: Option<&'a str>,
    password_hash: &'a str,
    email_validated: bool,
}

impl<'a> UserParams<'a> {
    fn of(user: &'a User) -> Self {
        Self {
            id: user.id().as_uuid(),
            username: user.username().map(Username::as_str),
            email: user.email().map(Email::as_str),
            password_hash: user.password_hash().as_str(),
            email_validated: user.is_email_validated(),
        }
    }
}

/// Opens PostgreSQL transactions from a shared pool.
#[derive(Clone)]
pub struct PostgresTransactionFactory {
    pool: PgPool,
}

impl PostgresTransactionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionFactory for PostgresTransactionFactory {
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, InfrastructureError> {
        let tx = self.pool.begin().await.map_err(|e| {
            InfrastructureError::Transaction(format!("Failed to start transaction: {}", e))
        })?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// An open PostgreSQL transaction.
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PostgresTransaction {
    async fn fetch_user(
        &mut self,
        filter: &str,
        value: &str,
    ) -> Result<Option<User>, InfrastructureError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, filter);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| InfrastructureError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresTransaction {
    async fn get_by_id(&mut self, id: &UserId) -> Result<Option<User>, InfrastructureError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| InfrastructureError::database(format!("Failed to fetch user: {}", e)))?;

        row.map(row_to_user).transpose()
    }

    async fn get_by_email(&mut self, email: &Email) -> Result<Option<User>, InfrastructureError> {
        self.fetch_user("email", email.as_str()).await
    }

    async fn get_by_username(
        &mut self,
        username: &Username,
    ) -> Result<Option<User>, InfrastructureError> {
        self.fetch_user("username", username.as_str()).await
    }

    async fn create(&mut self, user: &User) -> Result<(), InfrastructureError> {
        let params = UserParams::of(user);
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, email_validated)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(params.id)
        .bind(params.username)
        .bind(params.email)
        .bind(params.password_hash)
        .bind(params.email_validated)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert user"))?;

        Ok(())
    }

    async fn update(&mut self, user: &User) -> Result<(), InfrastructureError> {
        let params = UserParams::of(user);
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = $2,
                email = $3,
                password_hash = $4,
                email_validated = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(params.id)
        .bind(params.username)
        .bind(params.email)
        .bind(params.password_hash)
        .bind(params.email_validated)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(InfrastructureError::database(format!(
                "User not found: {}",
                user.id()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl StorageTransaction for PostgresTransaction {
    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    async fn append_outbox(&mut self, records: &[OutboxRecord]) -> Result<(), InfrastructureError> {
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO outbox_messages (
                    id, type_tag, payload_json, created_at, delivered_at, attempts, last_error
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(&record.type_tag)
            .bind(&record.payload_json)
            .bind(record.created_at)
            .bind(record.delivered_at)
            .bind(record.attempts as i32)
            .bind(&record.last_error)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                InfrastructureError::database(format!("Failed to insert outbox record: {}", e))
            })?;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), InfrastructureError> {
        self.tx.commit().await.map_err(|e| {
            InfrastructureError::Transaction(format!("Failed to commit transaction: {}", e))
        })
    }

    async fn rollback(self: Box<Self>) -> Result<(), InfrastructureError> {
        self.tx.rollback().await.map_err(|e| {
            InfrastructureError::Transaction(format!("Failed to roll back transaction: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OutcomeExt;

    #[test]
    fn user_params_follow_the_aggregate() {
        let mut user = User::register(
            Some("alice.smith".into()),
            Some("alice@example.com".into()),
            "argon2-digest".into(),
        )
        .value();
        user.validate_email();

        let params = UserParams::of(&user);

        assert_eq!(params.id, user.id().as_uuid());
        assert_eq!(params.username, Some("alice.smith"));
        assert_eq!(params.email, Some("alice@example.com"));
        assert_eq!(params.password_hash, "argon2-digest");
        assert!(params.email_validated);
    }

    #[test]
    fn user_params_leave_missing_fields_null() {
        let user = User::register(None, Some("bob@example.com".into()), "digest".into()).value();

        let params = UserParams::of(&user);

        assert_eq!(params.username, None);
        assert!(!params.email_validated);
    }
}
