//! Credential repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::credential::CredentialRecord;
use crate::{AppError, Result};

use super::db::Database;
use super::{CredentialStore, StoreFuture};

/// [`CredentialStore`] backed by the `credential` table.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: String,
    secret: String,
    created_at: String,
    updated_at: String,
}

impl CredentialRow {
    fn into_record(self) -> Result<CredentialRecord> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);
        let updated_at = chrono::DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| AppError::Db(format!("invalid updated_at: {e}")))?
            .with_timezone(&Utc);

        Ok(CredentialRecord {
            user_id: self.user_id,
            secret: self.secret,
            created_at,
            updated_at,
        })
    }
}

impl SqliteCredentialStore {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<CredentialRecord>> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT user_id, secret, created_at, updated_at
             FROM credential WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(CredentialRow::into_record).transpose()
    }

    async fn upsert(&self, user_id: &str, secret: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO credential (user_id, secret, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                 secret = excluded.secret,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(secret)
        .bind(&now)
        .execute(self.db.as_ref())
        .await?;

        Ok(())
    }

    async fn remove(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM credential WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_all(&self) -> Result<Vec<CredentialRecord>> {
        let rows: Vec<CredentialRow> = sqlx::query_as(
            "SELECT user_id, secret, created_at, updated_at
             FROM credential ORDER BY user_id ASC",
        )
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(CredentialRow::into_record).collect()
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn get<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, Option<CredentialRecord>> {
        Box::pin(self.fetch(user_id))
    }

    fn put<'a>(&'a self, user_id: &'a str, secret: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(self.upsert(user_id, secret))
    }

    fn delete<'a>(&'a self, user_id: &'a str) -> StoreFuture<'a, bool> {
        Box::pin(self.remove(user_id))
    }

    fn list(&self) -> StoreFuture<'_, Vec<CredentialRecord>> {
        Box::pin(self.fetch_all())
    }
}
