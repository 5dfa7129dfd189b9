use crate::error::TranslationError;
use crate::store::TranslationStore;
use crate::translation::{Translation, TranslationKey};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const SELECT_COLUMNS: &str = "SELECT id, entity_type, entity_id, language, field, text FROM translations";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and ensure the schema
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context(format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .context(format!("Failed to open database at {}", database_url))?;

        let db = Self { pool };
        db.create_schema().await?;

        info!("Opened translation database at {}", database_url);
        Ok(db)
    }

    /// Private in-memory database.
    ///
    /// Pinned to a single connection that never expires, since every SQLite
    /// in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.create_schema().await?;
        Ok(db)
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entity_type TEXT NOT NULL,
                entity_id INTEGER NOT NULL CHECK (entity_id >= 0),
                language TEXT NOT NULL,
                field TEXT NOT NULL,
                text TEXT,
                UNIQUE (entity_type, entity_id, language, field)
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create translations table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_translations_language ON translations (language)")
            .execute(&self.pool)
            .await
            .context("Failed to create language index")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_translations_field ON translations (field)")
            .execute(&self.pool)
            .await
            .context("Failed to create field index")?;

        Ok(())
    }

    /// Total number of translation records
    pub async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translations")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count translations")?;
        Ok(count as usize)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TranslationStore for Database {
    async fn get_or_create(&self, key: &TranslationKey) -> Result<Translation> {
        // The unique constraint decides the race; losers fall through to the SELECT.
        let inserted = sqlx::query(
            "INSERT INTO translations (entity_type, entity_id, language, field, text)
             VALUES (?1, ?2, ?3, ?4, NULL)
             ON CONFLICT (entity_type, entity_id, language, field) DO NOTHING",
        )
        .bind(&key.entity_type)
        .bind(key.entity_id)
        .bind(&key.language)
        .bind(&key.field)
        .execute(&self.pool)
        .await
        .context(format!("Failed to create translation {}", key))?
        .rows_affected();

        if inserted > 0 {
            debug!("Created translation record {}", key);
        }

        let record = sqlx::query_as::<_, Translation>(&format!(
            "{} WHERE entity_type = ?1 AND entity_id = ?2 AND language = ?3 AND field = ?4",
            SELECT_COLUMNS
        ))
        .bind(&key.entity_type)
        .bind(key.entity_id)
        .bind(&key.language)
        .bind(&key.field)
        .fetch_one(&self.pool)
        .await
        .context(format!("Failed to load translation {}", key))?;

        Ok(record)
    }

    async fn filter(
        &self,
        entity_type: &str,
        entity_id: i64,
        language: &str,
    ) -> Result<Vec<Translation>> {
        let records = sqlx::query_as::<_, Translation>(&format!(
            "{} WHERE entity_type = ?1 AND entity_id = ?2 AND language = ?3 ORDER BY field ASC",
            SELECT_COLUMNS
        ))
        .bind(entity_type)
        .bind(entity_id)
        .bind(language)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list translations")?;

        Ok(records)
    }

    async fn save(&self, translation: &Translation) -> Result<()> {
        let rows_affected = sqlx::query("UPDATE translations SET text = ?1 WHERE id = ?2")
            .bind(&translation.text)
            .bind(translation.id)
            .execute(&self.pool)
            .await
            .context("Failed to save translation")?
            .rows_affected();

        if rows_affected == 0 {
            return Err(TranslationError::NotFound(translation.id).into());
        }

        Ok(())
    }
}
