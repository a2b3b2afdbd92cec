//! Application state.
//!
//! Shared state for all request handlers.

use mirage_site::PageService;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Lazy page cache.
    pub(crate) pages: PageService,
}
