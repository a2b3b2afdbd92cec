//! OpenAI-compatible completions client.
//!
//! Sends `POST {base_url}/completions` with bearer authentication and reads
//! the first choice's text. The HTTP call is blocking (`ureq`) and runs on
//! tokio's blocking pool so it never stalls the request handlers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mirage_store::PageKind;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::prompt::build_prompt;
use crate::{ContentGenerator, GenerateError};

/// Provider settings for [`CompletionGenerator`].
#[derive(Clone)]
pub struct CompletionSettings {
    /// Bearer token.
    pub api_key: String,
    /// API base URL (e.g., "<https://api.openai.com/v1>").
    pub base_url: String,
    /// Completion model.
    pub model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Global request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Blocking completions client.
struct CompletionClient {
    agent: Agent,
    endpoint: String,
    settings: CompletionSettings,
}

impl CompletionClient {
    fn new(settings: CompletionSettings) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: format!("{}/completions", settings.base_url.trim_end_matches('/')),
            settings,
        }
    }

    /// Request one completion for `prompt`.
    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = CompletionRequest {
            model: &self.settings.model,
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", self.settings.api_key))
            .send_json(&request)
            .map_err(|e| GenerateError::Provider(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| GenerateError::Provider(e.to_string()))?;

        if status >= 400 {
            return Err(GenerateError::Provider(provider_error_message(status, &body)));
        }

        parse_completion(&body)
    }
}

/// Extract the first completion's text from a response body.
fn parse_completion(body: &str) -> Result<String, GenerateError> {
    let response: CompletionResponse = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed completion response");
        GenerateError::Unknown
    })?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text)
        .ok_or(GenerateError::Unknown)
}

/// Build a failure message from an error response.
///
/// Prefers the provider's `error.message`, then the raw body, then the status.
fn provider_error_message(status: u16, body: &str) -> String {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return api_error.error.message;
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}

/// [`ContentGenerator`] backed by an OpenAI-compatible completions API.
pub struct CompletionGenerator {
    client: Arc<CompletionClient>,
}

impl CompletionGenerator {
    /// Create a generator from provider settings.
    #[must_use]
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            client: Arc::new(CompletionClient::new(settings)),
        }
    }
}

impl fmt::Debug for CompletionGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionGenerator")
            .field("endpoint", &self.client.endpoint)
            .field("model", &self.client.settings.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentGenerator for CompletionGenerator {
    async fn generate(&self, kind: PageKind, request_path: &str) -> Result<String, GenerateError> {
        let prompt = build_prompt(kind, request_path);
        let client = Arc::clone(&self.client);

        tokio::task::spawn_blocking(move || client.complete(&prompt))
            .await
            .map_err(|e| GenerateError::Provider(format!("generation task failed: {e}")))?
    }
}
