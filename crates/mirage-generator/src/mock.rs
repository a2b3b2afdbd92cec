//! Scripted generator for testing.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use mirage_store::PageKind;

use crate::{ContentGenerator, GenerateError};

/// [`ContentGenerator`] that replays queued outcomes.
///
/// Outcomes are returned in the order they were queued. Once the queue is
/// empty every call fails with a provider error. All calls are recorded.
///
/// # Example
///
/// ```ignore
/// use mirage_generator::ScriptedGenerator;
///
/// let generator = ScriptedGenerator::new()
///     .then_ok("<!--Home-->\n<p>hi</p>")
///     .then_err("rate limited");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    outcomes: Mutex<VecDeque<Result<String, GenerateError>>>,
    requests: Mutex<Vec<(PageKind, String)>>,
}

impl ScriptedGenerator {
    /// Create a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful generation.
    #[must_use]
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a provider failure with `reason`.
    #[must_use]
    pub fn then_err(self, reason: impl Into<String>) -> Self {
        self.push(Err(GenerateError::Provider(reason.into())));
        self
    }

    /// Queue an arbitrary outcome.
    #[must_use]
    pub fn then(self, outcome: Result<String, GenerateError>) -> Self {
        self.push(outcome);
        self
    }

    /// Number of `generate` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every `(kind, request_path)` passed to `generate`, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<(PageKind, String)> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, outcome: Result<String, GenerateError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, kind: PageKind, request_path: &str) -> Result<String, GenerateError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, request_path.to_owned()));

        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(GenerateError::Provider("no scripted response".to_owned())))
    }
}
