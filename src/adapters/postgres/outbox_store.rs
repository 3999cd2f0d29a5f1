//! PostgreSQL implementation of OutboxStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::InfrastructureError;
use crate::ports::{OutboxRecord, OutboxStore};

/// Reads and marks rows of `outbox_messages`.
#[derive(Clone)]
pub struct PostgresOutboxStore {
    pool: PgPool,
}

impl PostgresOutboxStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxStore for PostgresOutboxStore {
    async fn fetch_undelivered(
        &self,
        limit: Option<u32>,
        max_attempts: Option<u32>,
    ) -> Result<Vec<OutboxRecord>, InfrastructureError> {
        // NULL binds disable the respective bound.
        let rows = sqlx::query(
            r#"
            SELECT id, type_tag, payload_json, created_at, delivered_at, attempts, last_error
            FROM outbox_messages
            WHERE delivered_at IS NULL
              AND ($1::INTEGER IS NULL OR attempts < $1)
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(max_attempts.map(|n| n as i32))
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            InfrastructureError::database(format!("Failed to fetch outbox records: {}", e))
        })?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn mark_delivered(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, InfrastructureError> {
        let result = sqlx::query(
            "UPDATE outbox_messages SET delivered_at = $2 WHERE id = $1 AND delivered_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            InfrastructureError::database(format!("Failed to mark outbox record delivered: {}", e))
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), InfrastructureError> {
        let result = sqlx::query(
            "UPDATE outbox_messages SET attempts = attempts + 1, last_error = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            InfrastructureError::database(format!("Failed to record outbox failure: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(InfrastructureError::database(format!(
                "Outbox record not found: {}",
                id
            )));
        }
        Ok(())
    }
}

fn row_to_record(row: PgRow) -> Result<OutboxRecord, InfrastructureError> {
    let read = |e: sqlx::Error| InfrastructureError::corrupt(format!("Bad outbox row: {}", e));
    let attempts: i32 = row.try_get("attempts").map_err(read)?;

    Ok(OutboxRecord {
        id: row.try_get("id").map_err(read)?,
        type_tag: row.try_get("type_tag").map_err(read)?,
        payload_json: row.try_get("payload_json").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
        delivered_at: row.try_get("delivered_at").map_err(read)?,
        attempts: attempts.max(0) as u32,
        last_error: row.try_get("last_error").map_err(read)?,
    })
}
