//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use vantage_engine::ProvidersConfig;

const CONFIG_DIR: &str = ".vantage";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DB_FILE: &str = "investigations.db";

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Investigation store
    #[serde(default)]
    pub store: StoreSettings,

    /// Provider settings handed to the engine
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Log filter used when VANTAGE_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where investigations are saved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// SQLite database file; defaults to ~/.vantage/investigations.db
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the default config and database.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(CONFIG_DIR))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join(CONFIG_FILE))
    }

    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Self::from_toml_str(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config
            .providers
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Resolved database path.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home_dir()?.join(DEFAULT_DB_FILE)),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.settings.log_level, "warn");
        assert!(config.store.path.is_none());
        assert_eq!(config.providers.phone_default_country_code, "353");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [settings]
            format = "json"
            color = false
            log_level = "debug"

            [store]
            path = "/tmp/vantage-test.db"

            [providers]
            disabled = ["IP Address Classification"]

            [providers.credentials]
            hibp_api_key = "secret"
        "#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(!config.settings.color);
        assert_eq!(config.settings.log_level, "debug");
        assert_eq!(config.store_path().unwrap(), PathBuf::from("/tmp/vantage-test.db"));
        assert!(config.providers.is_disabled("IP Address Classification"));
        assert_eq!(config.providers.credential("hibp_api_key"), Some("secret"));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let config = Config::from_toml_str("[settings]\ncolor = false\n").unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.settings.log_level, "warn");
    }

    #[test]
    fn test_malformed_config() {
        let result = Config::from_toml_str("[settings]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(CliError::Toml(_))));

        let result = Config::from_toml_str("[providers]\nphone_default_country_code = \"abc\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\nformat = \"quiet\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Quiet);

        let missing = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(missing.settings.format, OutputFormat::Table);
    }
}
