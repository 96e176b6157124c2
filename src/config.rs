//! Runtime configuration
//!
//! The runtime glue is configured through a small TOML document, whose every
//! field has a sensible default. Environment variables take precedence over
//! whatever the document says:
//!
//! - `THREADED_SENDERS_LOG` overrides `log_filter`
//! - `THREADED_SENDERS_INSTALL_LOGGER` overrides `install_logger`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;


/// Environment variable overriding the log filter
pub const LOG_FILTER_VAR: &str = "THREADED_SENDERS_LOG";

/// Environment variable overriding logger installation
pub const INSTALL_LOGGER_VAR: &str = "THREADED_SENDERS_INSTALL_LOGGER";


#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;


/// Configuration of the runtime glue
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Filter directives handed to the logger, e.g. "info" or
    /// "threaded_senders=trace"
    pub log_filter: String,

    /// Whether the runtime should install a logger before running the entry
    /// function
    pub install_logger: bool,
}
//
impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            log_filter: "info".to_owned(),
            install_logger: true,
        }
    }
}
//
impl RuntimeConfig {
    /// Default configuration, with environment overrides applied
    pub fn load() -> ConfigResult<Self> {
        let mut config = RuntimeConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML configuration document
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file, with environment overrides applied
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply the environment variable overrides
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
        where F: Fn(&str) -> Option<String>
    {
        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            self.log_filter = filter;
        }
        if let Some(install) = lookup(INSTALL_LOGGER_VAR) {
            self.install_logger = match install.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => return Err(ConfigError::Validation(
                    format!("{} must be a boolean, got {:?}",
                            INSTALL_LOGGER_VAR, other)
                )),
            };
        }
        self.validate()
    }

    /// Check that the configuration makes sense
    pub fn validate(&self) -> ConfigResult<()> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_filter must not be empty".to_owned()
            ));
        }
        Ok(())
    }
}
