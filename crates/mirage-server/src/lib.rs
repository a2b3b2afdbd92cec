//! HTTP server for Mirage.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - A landing page at `/`
//! - The full page table as JSON at `/all`
//! - A redirect helper at `/goto?redir=<target>`
//! - Every other path through the lazy page cache ([`mirage_site::PageService`])
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::time::Duration;
//! use mirage_generator::CompletionSettings;
//! use mirage_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 7878,
//!         db_path: PathBuf::from(".mirage/pages.db"),
//!         generator: CompletionSettings {
//!             api_key: std::env::var("OPENAI_API_KEY").unwrap(),
//!             base_url: "https://api.openai.com/v1".to_string(),
//!             model: "gpt-3.5-turbo-instruct".to_string(),
//!             max_tokens: 2048,
//!             temperature: 0.7,
//!             timeout: Duration::from_secs(120),
//!         },
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Request Flow
//!
//! ```text
//! GET /about ──► PageService ──► lookup "/about/index.html"
//!                                   │
//!                  hit ◄────────────┴────────────► miss
//!                   │                                │
//!              normalize                          generate
//!                   │                                │
//!              200 text/html                 insert_if_absent
//!                                                    │
//!                                            303 Location: /about
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mirage_config::{Config, ConfigError};
use mirage_generator::{CompletionGenerator, CompletionSettings, ContentGenerator};
use mirage_site::PageService;
use mirage_store::{ContentStore, SqliteStore};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// `SQLite` database holding generated pages.
    pub db_path: PathBuf,
    /// Text-generation provider settings.
    pub generator: CompletionSettings,
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the page store cannot be opened or the server fails
/// to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn ContentStore> = Arc::new(SqliteStore::open(&config.db_path).await?);
    let generator: Arc<dyn ContentGenerator> =
        Arc::new(CompletionGenerator::new(config.generator));

    let state = Arc::new(AppState {
        pages: PageService::new(store, generator),
    });

    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Mirage config.
///
/// # Errors
///
/// Returns `ConfigError::Validation` if no provider API key is configured.
pub fn server_config_from_mirage_config(config: &Config) -> Result<ServerConfig, ConfigError> {
    let api_key = config.require_api_key()?.to_owned();
    let generator = &config.generator;

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        db_path: config.store_resolved.path.clone(),
        generator: CompletionSettings {
            api_key,
            base_url: generator.base_url.clone(),
            model: generator.model.clone(),
            max_tokens: generator.max_tokens,
            temperature: generator.temperature,
            timeout: Duration::from_secs(generator.timeout_secs),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_mirage_config() {
        let mut config = Config::default();
        config.generator.api_key = "sk-test".to_owned();
        config.generator.timeout_secs = 30;

        let server_config = server_config_from_mirage_config(&config).unwrap();

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 7878);
        assert_eq!(server_config.db_path, config.store_resolved.path);
        assert_eq!(server_config.generator.api_key, "sk-test");
        assert_eq!(server_config.generator.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_server_config_requires_api_key() {
        let mut config = Config::default();
        config.generator.api_key = String::new();

        let result = server_config_from_mirage_config(&config);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
