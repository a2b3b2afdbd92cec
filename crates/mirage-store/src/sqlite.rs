//! `SQLite`-backed content store.
//!
//! Pages live in a single append-only table:
//!
//! ```text
//! pages(
//!     id      INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
//!     key     TEXT NOT NULL UNIQUE,
//!     kind    TEXT NOT NULL,
//!     content TEXT NOT NULL
//! )
//! ```
//!
//! Inserts use `ON CONFLICT(key) DO NOTHING`, so two requests racing to fill
//! the same key both complete and exactly one row survives.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::{ContentStore, Page, PageKind, StoreError};

/// Maximum pooled connections for file-backed databases.
const MAX_CONNECTIONS: u32 = 8;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    content TEXT NOT NULL
)";

/// [`ContentStore`] backed by an `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// Missing parent directories are created.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::info!(path = %path.display(), "Opened page store");
        Self::with_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// Every `SQLite` connection to `:memory:` is a separate database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    async fn try_insert(
        &self,
        key: &str,
        kind: PageKind,
        content: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO pages (key, kind, content) VALUES (?1, ?2, ?3) ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(kind.tag())
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn try_lookup(&self, key: &str) -> Result<Option<String>, StoreError> {
        let content = sqlx::query_scalar::<_, String>("SELECT content FROM pages WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(content)
    }

    async fn try_list_all(&self) -> Result<Vec<Page>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT key, kind, content FROM pages ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let pages = rows
            .into_iter()
            .filter_map(|(key, tag, content)| {
                let Some(kind) = PageKind::from_tag(&tag) else {
                    tracing::warn!(key = %key, kind = %tag, "Skipping page with unsupported kind");
                    return None;
                };
                Some(Page { kind, key, content })
            })
            .collect();
        Ok(pages)
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn insert_if_absent(&self, key: &str, kind: PageKind, content: &str) -> bool {
        match self.try_insert(key, kind, content).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(key = %key, "Page already stored, insert skipped");
                false
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to store page");
                false
            }
        }
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        self.try_lookup(key).await.unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Failed to look up page");
            None
        })
    }

    async fn list_all(&self) -> Option<Vec<Page>> {
        self.try_list_all()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to list pages"))
            .ok()
    }
}
