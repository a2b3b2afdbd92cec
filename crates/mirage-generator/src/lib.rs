//! Page content generation for Mirage.
//!
//! Turns a request path into raw page text by prompting an external
//! text-generation provider. The prompt depends on the page kind; each
//! [`PageKind`] has exactly one template with a single `{path}` placeholder.
//!
//! # Implementations
//!
//! - [`CompletionGenerator`]: OpenAI-compatible text completions API
//! - [`ScriptedGenerator`]: queued canned outcomes for tests (behind `mock` feature flag)

mod completion;
#[cfg(feature = "mock")]
mod mock;
mod prompt;

use async_trait::async_trait;
use mirage_store::PageKind;

pub use completion::{CompletionGenerator, CompletionSettings};
#[cfg(feature = "mock")]
pub use mock::ScriptedGenerator;
pub use prompt::{build_prompt, prompt_template};

/// Source of raw page content.
///
/// Implementations do not fall back to another kind and do not retry: a
/// failed call is reported once and left to the caller.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate raw content of `kind` for `request_path`.
    async fn generate(&self, kind: PageKind, request_path: &str) -> Result<String, GenerateError>;
}

/// Generation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Transport or provider-side failure, carrying the provider's message.
    #[error("{0}")]
    Provider(String),

    /// Provider answered without a usable completion.
    #[error("unknown failure")]
    Unknown,
}
