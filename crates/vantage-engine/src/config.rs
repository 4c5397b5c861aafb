//! Configuration file parsing for the engine.
//!
//! Loads provider settings from TOML: which providers are disabled, the
//! credentials available to them, and provider tuning values.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Engine configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Provider settings
    pub providers: ProvidersConfig,
}

/// Settings handed to every provider constructor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Provider names to leave out of the registry
    pub disabled: Vec<String>,

    /// Credential name -> secret
    pub credentials: BTreeMap<String, String>,

    /// Calling code assumed for national numbers starting with 0
    pub phone_default_country_code: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            credentials: BTreeMap::new(),
            phone_default_country_code: default_country_code(),
        }
    }
}

/// Default calling code: Ireland
fn default_country_code() -> String {
    "353".to_string()
}

impl ProvidersConfig {
    /// Look up a configured, non-empty credential
    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Whether a provider was disabled by name
    pub fn is_disabled(&self, provider: &str) -> bool {
        self.disabled.iter().any(|d| d == provider)
    }

    /// Check values that serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = &self.phone_default_country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "phone_default_country_code".to_string(),
                reason: format!("'{}' is not a 1-3 digit calling code", code),
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.providers.validate()?;
        Ok(config)
    }
}
