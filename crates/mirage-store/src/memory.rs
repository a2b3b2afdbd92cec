//! In-memory content store for testing.
//!
//! Provides [`MemoryStore`] for unit testing without a database.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::{ContentStore, Page, PageKind};

/// In-memory [`ContentStore`].
///
/// Pages are kept in insertion order. A store built with
/// [`MemoryStore::failing`] simulates a storage outage: every operation
/// returns its failure sentinel.
///
/// # Example
///
/// ```ignore
/// use mirage_store::{ContentStore, MemoryStore, PageKind};
///
/// let store = MemoryStore::new().with_page("/index.html", PageKind::Html, "<p>home</p>");
/// assert_eq!(store.lookup("/index.html").await.as_deref(), Some("<p>home</p>"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: RwLock<Vec<Page>>,
    failing: bool,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            pages: RwLock::new(Vec::new()),
            failing: true,
        }
    }

    /// Seed the store with a page.
    #[must_use]
    pub fn with_page(
        self,
        key: impl Into<String>,
        kind: PageKind,
        content: impl Into<String>,
    ) -> Self {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Page {
                kind,
                key: key.into(),
                content: content.into(),
            });
        self
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert_if_absent(&self, key: &str, kind: PageKind, content: &str) -> bool {
        if self.failing {
            tracing::warn!(key = %key, "Failed to store page: store unavailable");
            return false;
        }

        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        if pages.iter().any(|page| page.key == key) {
            return false;
        }
        pages.push(Page {
            kind,
            key: key.to_owned(),
            content: content.to_owned(),
        });
        true
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        if self.failing {
            tracing::warn!(key = %key, "Failed to look up page: store unavailable");
            return None;
        }

        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|page| page.key == key)
            .map(|page| page.content.clone())
    }

    async fn list_all(&self) -> Option<Vec<Page>> {
        if self.failing {
            tracing::warn!("Failed to list pages: store unavailable");
            return None;
        }

        Some(self.pages.read().unwrap_or_else(PoisonError::into_inner).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_is_write_once() {
        let store = MemoryStore::new();

        assert!(store.insert_if_absent("/a/index.html", PageKind::Html, "first").await);
        assert!(!store.insert_if_absent("/a/index.html", PageKind::Html, "second").await);

        assert_eq!(store.lookup("/a/index.html").await.as_deref(), Some("first"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_store_returns_sentinels() {
        let store = MemoryStore::failing();

        assert!(!store.insert_if_absent("/a/index.html", PageKind::Html, "a").await);
        assert_eq!(store.lookup("/a/index.html").await, None);
        assert_eq!(store.list_all().await, None);
        assert!(store.is_empty());
    }
}
