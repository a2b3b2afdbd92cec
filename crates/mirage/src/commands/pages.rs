//! `mirage pages` command implementation.

use std::path::PathBuf;

use clap::Args;
use mirage_config::{CliSettings, Config};
use mirage_store::{ContentStore, SqliteStore};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    /// Path to configuration file (default: auto-discover mirage.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page database file (overrides config).
    #[arg(long = "db", env = "MIRAGE_DB")]
    db_path: Option<PathBuf>,
}

impl PagesArgs {
    /// Execute the pages command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the store cannot be read.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            db_path: self.db_path,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let db_path = &config.store_resolved.path;
        if !db_path.exists() {
            output.info(&format!("No page database at {}", db_path.display()));
            output.data("[]")?;
            return Ok(());
        }

        let store = SqliteStore::open(db_path).await?;
        let pages = store.list_all().await.ok_or(CliError::StoreUnavailable)?;

        output.data(&serde_json::to_string_pretty(&pages)?)?;
        Ok(())
    }
}
