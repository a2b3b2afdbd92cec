//! Page resolution for Mirage.
//!
//! This crate provides:
//! - [`canonicalize`]: request path to storage key mapping
//! - [`normalize`]: raw generated text to complete HTML document
//! - [`PageService`]: lookup, generate-on-miss and serve-on-hit orchestration
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use mirage_generator::{CompletionGenerator, CompletionSettings};
//! use mirage_site::{PageOutcome, PageService};
//! use mirage_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open(".mirage/pages.db".as_ref()).await?);
//! let generator = Arc::new(CompletionGenerator::new(CompletionSettings {
//!     api_key: "sk-...".to_owned(),
//!     base_url: "https://api.openai.com/v1".to_owned(),
//!     model: "gpt-3.5-turbo-instruct".to_owned(),
//!     max_tokens: 2048,
//!     temperature: 0.7,
//!     timeout: Duration::from_secs(120),
//! }));
//! let service = PageService::new(store, generator);
//!
//! match service.resolve("/about").await {
//!     PageOutcome::Serve { document, .. } => println!("{document}"),
//!     PageOutcome::Redirect => println!("generated, fetch again"),
//!     PageOutcome::GenerationFailed { reason } => eprintln!("{reason}"),
//! }
//! # Ok(())
//! # }
//! ```

mod canonical;
mod normalize;
mod service;

pub use canonical::{DEFAULT_DOCUMENT, canonicalize, kind_for_key};
pub use normalize::{FALLBACK_TITLE, normalize};
pub use service::{PageOutcome, PageService};
