use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{ConversationRecord, NewConversation, RecordUpdate};
use crate::store::RecordStore;

const SELECT_COLUMNS: &str = "id, start_with_doctor, text, risk_score, memo, created_at";

/// SQLite-backed record store
///
/// `created_at` is kept as integer microseconds since the epoch so ordering
/// is numeric rather than lexical.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Connect to `database_url` (e.g. `sqlite://consultlog.db`), creating the
    /// file and the table if missing
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        debug!("Connecting to database: {}", database_url);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to open database connection")?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, one connection so every query sees it
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        init_tables(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Create the conversations table if it does not exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_with_doctor BOOLEAN NOT NULL,
            text TEXT NOT NULL,
            risk_score INTEGER NOT NULL,
            memo TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create conversations table")?;

    info!("Database table checked/created");
    Ok(())
}

fn record_from_row(row: &SqliteRow) -> Result<ConversationRecord, sqlx::Error> {
    let micros: i64 = row.try_get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| sqlx::Error::Decode(format!("created_at out of range: {}", micros).into()))?;

    Ok(ConversationRecord {
        id: row.try_get("id")?,
        starts_with_doctor: row.try_get("start_with_doctor")?,
        transcript: row.try_get("text")?,
        risk_score: row.try_get("risk_score")?,
        annotation: row.try_get("memo")?,
        created_at,
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(&self, record: &NewConversation) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO conversations (start_with_doctor, text, risk_score, memo, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.starts_with_doctor)
        .bind(&record.transcript)
        .bind(record.risk_score)
        .bind(&record.annotation)
        .bind(record.created_at.timestamp_micros())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<ConversationRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM conversations WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn list(&self) -> Result<Vec<ConversationRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM conversations ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(
        &self,
        id: i64,
        update: &RecordUpdate,
    ) -> Result<Option<ConversationRecord>, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE conversations SET
                start_with_doctor = COALESCE(?, start_with_doctor),
                text = COALESCE(?, text),
                risk_score = COALESCE(?, risk_score),
                memo = COALESCE(?, memo)
            WHERE id = ?
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(update.starts_with_doctor)
        .bind(update.transcript.as_deref())
        .bind(update.risk_score)
        .bind(update.annotation.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
