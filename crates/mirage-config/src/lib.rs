//! Configuration management for Mirage.
//!
//! Parses `mirage.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `store.path`
//! - `generator.api_key`
//! - `generator.base_url`
//! - `generator.model`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the page database path.
    pub db_path: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mirage.toml";

/// Project directory holding Mirage data, relative to the config directory.
const PROJECT_DIR: &str = ".mirage";

/// Default database filename inside the project directory.
const DEFAULT_DB_FILENAME: &str = "pages.db";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Store configuration (paths are relative strings from TOML).
    store: StoreConfigRaw,
    /// Text-generation provider configuration.
    pub generator: GeneratorConfig,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Raw store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    path: Option<String>,
}

/// Resolved store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// `SQLite` database file holding generated pages.
    pub path: PathBuf,
}

/// Text-generation provider configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Completion model name.
    pub model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY:-}".to_owned(),
            base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-3.5-turbo-instruct".to_owned(),
            max_tokens: 2048,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`generator.api_key`").
        field: String,
        /// Error message (e.g., "${`OPENAI_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mirage.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged result
    /// is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let mut config = Self::default_with_cwd();
            config.expand_env_vars()?;
            config
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(db_path) = &settings.db_path {
            self.store_resolved.path.clone_from(db_path);
        }
    }

    /// Get the provider API key, failing when it is not configured.
    ///
    /// The key is only needed to serve pages, so it is checked on demand
    /// rather than during load.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the key is empty.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.generator.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "generator.api_key is not set (set OPENAI_API_KEY or generator.api_key)"
                    .to_owned(),
            ));
        }
        Ok(&self.generator.api_key)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfigRaw::default(),
            generator: GeneratorConfig::default(),
            store_resolved: StoreConfig {
                path: base.join(PROJECT_DIR).join(DEFAULT_DB_FILENAME),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called by [`Config::load`] once CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_generator()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate generator configuration.
    fn validate_generator(&self) -> Result<(), ConfigError> {
        const MAX_TEMPERATURE: f32 = 2.0;

        let generator = &self.generator;
        require_non_empty(&generator.base_url, "generator.base_url")?;
        require_http_url(&generator.base_url, "generator.base_url")?;
        require_non_empty(&generator.model, "generator.model")?;

        if generator.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "generator.max_tokens must be greater than 0".to_owned(),
            ));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&generator.temperature) {
            return Err(ConfigError::Validation(format!(
                "generator.temperature must be between 0 and {MAX_TEMPERATURE}"
            )));
        }
        if generator.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "generator.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.server.host, "server.host")?;

        if let Some(path) = &mut self.store.path {
            expand::expand_field(path, "store.path")?;
        }

        let generator = &mut self.generator;
        expand::expand_field(&mut generator.api_key, "generator.api_key")?;
        expand::expand_field(&mut generator.base_url, "generator.base_url")?;
        expand::expand_field(&mut generator.model, "generator.model")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let path = match self.store.path.as_deref() {
            Some(path) => config_dir.join(path),
            None => config_dir.join(PROJECT_DIR).join(DEFAULT_DB_FILENAME),
        };
        self.store_resolved = StoreConfig { path };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/test/.mirage/pages.db")
        );
        assert_eq!(config.generator.base_url, "https://api.openai.com/v1");
        assert_eq!(config.generator.model, "gpt-3.5-turbo-instruct");
        assert_eq!(config.generator.max_tokens, 2048);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_generator_config() {
        let toml = r#"
[generator]
api_key = "sk-test"
base_url = "http://localhost:8000/v1"
model = "local-model"
max_tokens = 512
temperature = 0.2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.api_key, "sk-test");
        assert_eq!(config.generator.base_url, "http://localhost:8000/v1");
        assert_eq!(config.generator.model, "local-model");
        assert_eq!(config.generator.max_tokens, 512);
        assert!((config.generator.temperature - 0.2).abs() < f32::EPSILON);
        // Unset fields keep their defaults
        assert_eq!(config.generator.timeout_secs, 120);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[store]
path = "data/site.db"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/project/data/site.db")
        );
    }

    #[test]
    fn test_resolve_paths_default_db() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.store_resolved.path,
            PathBuf::from("/project/.mirage/pages.db")
        );
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mirage.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9100

[generator]
api_key = "sk-file"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.generator.api_key, "sk-file");
        assert_eq!(config.store_resolved.path, tmp.path().join(".mirage/pages.db"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_invalid_cli_port() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mirage.toml");
        std::fs::write(&path, "[server]\nport = 9100\n").unwrap();
        let overrides = CliSettings {
            port: Some(0),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_load_rejects_empty_cli_host() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mirage.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            host: Some(String::new()),
            ..CliSettings::default()
        };

        let result = Config::load(Some(&path), Some(&overrides));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/mirage.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_apply_cli_settings_host() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7878); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_db_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            db_path: Some(PathBuf::from("/tmp/pages.db")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.store_resolved.path, PathBuf::from("/tmp/pages.db"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, config_before.server.host);
        assert_eq!(config.server.port, config_before.server.port);
        assert_eq!(config.store_resolved.path, config_before.store_resolved.path);
    }

    #[test]
    fn test_expand_env_vars_api_key() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MIRAGE_TEST_API_KEY", "sk-from-env");
        }

        let toml = r#"
[generator]
api_key = "${MIRAGE_TEST_API_KEY}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.generator.api_key, "sk-from-env");

        unsafe {
            std::env::remove_var("MIRAGE_TEST_API_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_default_api_key_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("OPENAI_API_KEY");
        }

        let mut config: Config = toml::from_str("").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.generator.api_key, "");
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MIRAGE_TEST_MISSING_HOST");
        }

        let toml = r#"
[server]
host = "${MIRAGE_TEST_MISSING_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("server.host"));
    }

    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation error");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for substring in expected_substrings {
            assert!(
                msg.contains(substring),
                "Expected error to contain '{substring}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port", "0"]);
    }

    #[test]
    fn test_validate_generator_base_url_invalid_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator.base_url = "ftp://api.example.com".to_owned();
        assert_validation_error(&config, &["generator.base_url", "http"]);
    }

    #[test]
    fn test_validate_generator_max_tokens_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator.max_tokens = 0;
        assert_validation_error(&config, &["generator.max_tokens"]);
    }

    #[test]
    fn test_validate_generator_temperature_out_of_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator.temperature = 3.5;
        assert_validation_error(&config, &["generator.temperature"]);
    }

    #[test]
    fn test_validate_generator_timeout_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator.timeout_secs = 0;
        assert_validation_error(&config, &["generator.timeout_secs"]);
    }

    #[test]
    fn test_require_api_key_present() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.generator.api_key = "sk-live".to_owned();
        assert_eq!(config.require_api_key().unwrap(), "sk-live");
    }
}
