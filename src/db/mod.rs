pub mod config;
pub mod models;
pub mod operations;
pub mod sqlite_schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

pub use config::StoreConfig;
pub use models::{
    Definition, Etymology, Example, ImportFailure, ImportReport, NewDefinition, NewEtymology,
    NewExample, NewRelatedWord, NewWord, RelatedWord, StatusCounts, Word, WordDetails,
    WordDetailsUpdate, WordId, WordStatus,
};

/// Handle to the vocabulary database.
///
/// Clones share the underlying pool. Call [`WordStore::close`] on shutdown.
#[derive(Debug, Clone)]
pub struct WordStore {
    pool: SqlitePool,
}

impl WordStore {
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Init(format!("create {}: {e}", parent.display()))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(config.journal_mode.to_sqlx())
            .synchronous(config.synchronous.to_sqlx())
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool).await?;
        tracing::info!(path = %config.path.display(), "word store opened");
        Ok(store)
    }

    /// Private in-memory database. Each `sqlite::memory:` connection is its own
    /// database, so the pool holds exactly one connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Init(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and applies the schema if needed. The pool's
    /// connections must have foreign keys enabled for cascading deletes.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlite_schema::bootstrap_schema(&pool)
            .await
            .map_err(|e| StoreError::Init(format!("schema bootstrap: {e}")))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("word store closed");
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("word {0} not found")]
    NotFound(WordId),
    #[error("word '{0}' already exists")]
    Conflict(String),
    #[error("database init failed: {0}")]
    Init(String),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn from_insert(err: sqlx::Error, word: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(word.to_string())
            }
            _ => StoreError::Storage(err),
        }
    }
}
