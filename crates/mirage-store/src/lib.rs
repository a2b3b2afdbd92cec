//! Content store for Mirage.
//!
//! This crate provides the write-once table mapping canonical page keys to
//! generated content. One trait forms the core API:
//!
//! - [`ContentStore`]: insert-if-absent, point lookup and full enumeration
//!
//! Store operations never return errors. Faults are logged through `tracing`
//! and reported as the absent sentinel (`false` / `None`), so callers treat
//! "not found" and "storage unavailable" identically.
//!
//! # Implementations
//!
//! - [`SqliteStore`]: `SQLite` table with a unique constraint on `key`
//! - [`MemoryStore`]: in-process store for tests (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), mirage_store::StoreError> {
//! use mirage_store::{ContentStore, PageKind, SqliteStore};
//!
//! let store = SqliteStore::in_memory().await?;
//! assert!(store.insert_if_absent("/index.html", PageKind::Html, "<p>hi</p>").await);
//! assert!(!store.insert_if_absent("/index.html", PageKind::Html, "<p>again</p>").await);
//! assert_eq!(store.lookup("/index.html").await.as_deref(), Some("<p>hi</p>"));
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "mock")]
mod memory;
mod page;
mod sqlite;

use async_trait::async_trait;

#[cfg(feature = "mock")]
pub use memory::MemoryStore;
pub use page::{Page, PageKind};
pub use sqlite::SqliteStore;

/// Durable mapping from canonical key to page content.
///
/// Keys are write-once: [`insert_if_absent`](ContentStore::insert_if_absent)
/// never overwrites an existing row. Concurrent inserts for the same key are
/// resolved by the backend's uniqueness guarantee, not by callers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create a page if `key` is not stored yet.
    ///
    /// Returns `false` if the key already exists or the write failed.
    async fn insert_if_absent(&self, key: &str, kind: PageKind, content: &str) -> bool;

    /// Retrieve the raw content stored under `key`.
    ///
    /// Returns `None` if no page exists or the read failed.
    async fn lookup(&self, key: &str) -> Option<String>;

    /// Enumerate every stored page in insertion order.
    ///
    /// Returns `None` if the read failed.
    async fn list_all(&self) -> Option<Vec<Page>>;
}

/// Error raised while opening a store.
///
/// Operation-level faults never surface as this type; they are logged and
/// converted to sentinels inside [`ContentStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error (e.g., creating the database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
