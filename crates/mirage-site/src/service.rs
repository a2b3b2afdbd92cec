//! Page service: the lazy-fill cache in front of the generator.
//!
//! A request first looks up its canonical key. A hit is normalized and
//! served. A miss generates content, stores it raw and asks the caller to
//! re-request the same path, so every served page goes through the same
//! lookup-then-normalize path.

use std::sync::Arc;

use mirage_generator::ContentGenerator;
use mirage_store::{ContentStore, Page, PageKind};

use crate::canonical::{canonicalize, kind_for_key};
use crate::normalize::normalize;

/// Result of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Stored page found; serve the normalized document.
    Serve {
        /// Content kind of the document.
        kind: PageKind,
        /// Complete document.
        document: String,
    },
    /// Page was just generated; the caller should re-request the same path.
    Redirect,
    /// Generation failed; nothing was stored.
    GenerationFailed {
        /// Provider failure reason.
        reason: String,
    },
}

/// Orchestrates lookup, generation and persistence of pages.
///
/// Concurrent misses for the same path are not deduplicated: each one calls
/// the generator, and the store's write-once guarantee keeps the first
/// insert.
pub struct PageService {
    store: Arc<dyn ContentStore>,
    generator: Arc<dyn ContentGenerator>,
}

impl PageService {
    /// Create a service over a store and a generator.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self { store, generator }
    }

    /// Resolve a (percent-decoded) request path.
    pub async fn resolve(&self, request_path: &str) -> PageOutcome {
        let key = canonicalize(request_path);

        if let Some((kind, document)) = self.stored_document(request_path, &key).await {
            return PageOutcome::Serve { kind, document };
        }

        let kind = kind_for_key(&key);
        tracing::debug!(path = %request_path, key = %key, kind = %kind, "Page cache miss");

        let content = match self.generator.generate(kind, request_path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %request_path, error = %e, "Page generation failed");
                return PageOutcome::GenerationFailed {
                    reason: e.to_string(),
                };
            }
        };

        // A lost race or a write fault still redirects; the next request
        // reads whichever row exists, or generates again.
        let stored = self.store.insert_if_absent(&key, kind, &content).await;
        tracing::info!(
            path = %request_path,
            key = %key,
            bytes = content.len(),
            stored,
            "Generated page"
        );

        PageOutcome::Redirect
    }

    /// Normalized stored page for a request path. A miss never generates.
    pub async fn lookup(&self, request_path: &str) -> Option<(PageKind, String)> {
        self.stored_document(request_path, &canonicalize(request_path)).await
    }

    async fn stored_document(&self, request_path: &str, key: &str) -> Option<(PageKind, String)> {
        let content = self.store.lookup(key).await?;
        tracing::debug!(path = %request_path, key = %key, "Page cache hit");
        Some((kind_for_key(key), normalize(&content)))
    }

    /// Every stored page, or `None` if the store is unavailable.
    pub async fn pages(&self) -> Option<Vec<Page>> {
        self.store.list_all().await
    }
}
