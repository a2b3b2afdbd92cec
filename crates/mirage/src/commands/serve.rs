//! `mirage serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mirage_config::{CliSettings, Config};
use mirage_server::{run_server, server_config_from_mirage_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mirage.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Page database file (overrides config).
    #[arg(long = "db", env = "MIRAGE_DB")]
    db_path: Option<PathBuf>,

    /// Enable verbose output (request and generation logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let server_config = server_config_from_mirage_config(&config)?;

        ensure_project_dir(&server_config.db_path)?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!(
            "Page database: {}",
            server_config.db_path.display()
        ));
        output.info(&format!("Model: {}", server_config.generator.model));

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// CLI overrides for the loaded configuration.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            db_path: self.db_path.clone(),
        }
    }
}

/// Ensure the database directory exists, with a `.gitignore` inside `.mirage/`.
fn ensure_project_dir(db_path: &Path) -> Result<(), CliError> {
    let Some(project_dir) = db_path.parent() else {
        return Ok(());
    };
    std::fs::create_dir_all(project_dir)
        .map_err(|e| CliError::Server(format!("Failed to create project directory: {e}")))?;

    if project_dir.file_name().is_some_and(|name| name == ".mirage") {
        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let _ = std::fs::write(&gitignore_path, "# Automatically created by mirage\n*\n");
        }
    }

    Ok(())
}
