//! Configuration with defaults, TOML files and environment overrides
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file,
//! `ROULETTE_*` environment variables, then CLI flags applied by the binary.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::IpAddr;
use std::path::Path;

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Log output settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "roulette=info,tower_http=info".to_string(),
        }
    }
}

/// Loads and validates an [`AppConfig`]
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Read settings from a TOML file as well
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let mut config = match self.config_path {
            Some(ref path) => Self::load_from_file(path)?,
            None => AppConfig::default(),
        };

        Self::apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        validate(&config)?;

        Ok(config)
    }

    fn load_from_file(path: &str) -> ConfigResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;

        Ok(toml::from_str(&content)?)
    }

    fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ROULETTE_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("ROULETTE_PORT") {
            config.server.port = parse_field("ROULETTE_PORT", port, "Invalid port number")?;
        }
        if let Some(timeout) = lookup("ROULETTE_REQUEST_TIMEOUT_SECS") {
            config.server.request_timeout_secs =
                parse_field("ROULETTE_REQUEST_TIMEOUT_SECS", timeout, "Invalid timeout value")?;
        }
        if let Some(filter) = lookup("ROULETTE_LOG") {
            config.logging.filter = filter;
        }

        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: String, reason: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

/// Validate configuration values
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    if config.server.port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "server.port".to_string(),
            value: "0".to_string(),
            reason: "Port cannot be zero".to_string(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "server.request_timeout_secs".to_string(),
            value: "0".to_string(),
            reason: "Timeout cannot be zero".to_string(),
        });
    }

    if config.server.host.parse::<IpAddr>().is_err() {
        return Err(ConfigError::InvalidValue {
            field: "server.host".to_string(),
            value: config.server.host.clone(),
            reason: "Not an IP address".to_string(),
        });
    }

    Ok(())
}
