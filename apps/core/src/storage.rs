//! Persistence collaborator.
//!
//! Key-value contract the engine persists through: `get(key)` and
//! `set(key, value)` over serialized strings. Failures are non-fatal to the
//! session; the engine degrades to memory-only mode.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::info;

use crate::error::BrainError;

/// Storage key for serialized message history.
pub const KEY_MESSAGES: &str = "ai-chat-messages";
/// Storage key for the serialized knowledge snapshot.
pub const KEY_KNOWLEDGE: &str = "ai-knowledge";
/// Storage key for free-text session notes.
pub const KEY_NOTES: &str = "ai-notes";
/// Storage key for the selected provider identifier.
pub const KEY_PROVIDER: &str = "ai-provider";

/// Durable key-value store for session state.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BrainError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), BrainError>;
}

/// SQLite-backed storage.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) a database file and run the schema.
    pub async fn open(path: &Path) -> Result<Self, BrainError> {
        let db_url = format!("sqlite://{}", path.to_string_lossy());
        info!("Initializing storage at: {}", db_url);

        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(BrainError::Storage)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Build storage over an existing pool (used with in-memory databases).
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, BrainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, BrainError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BrainError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// In-memory storage, for tests and storage-less embedding.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, BrainError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| BrainError::Validation(format!("storage lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BrainError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| BrainError::Validation(format!("storage lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
