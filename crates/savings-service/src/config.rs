//! Server configuration.

use std::path::{Path, PathBuf};

use savings_store::{DEFAULT_DEVICES_PATH, DEFAULT_SAVINGS_PATH, DataSources};
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Source data settings.
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server host is not empty and port is not 0
    /// - Both data file paths are set
    ///
    /// # Example
    ///
    /// ```
    /// use savings_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.data.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host or address to listen on.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push(ValidationError {
                field: "server.host".to_string(),
                message: "host cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            errors.push(ValidationError {
                field: "server.port".to_string(),
                message: "port cannot be 0".to_string(),
            });
        }

        errors
    }
}

/// Source data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Device metadata CSV file.
    pub devices: PathBuf,
    /// Savings time-series CSV file.
    pub savings: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            devices: PathBuf::from(DEFAULT_DEVICES_PATH),
            savings: PathBuf::from(DEFAULT_SAVINGS_PATH),
        }
    }
}

impl DataConfig {
    /// Validate data configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, path) in [("data.devices", &self.devices), ("data.savings", &self.savings)] {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: "data file path cannot be empty".to_string(),
                });
            }
        }

        errors
    }

    /// Paths handed to the dataset loader.
    pub fn sources(&self) -> DataSources {
        DataSources::new(&self.devices, &self.savings)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.port` or `data.savings`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("energy-savings")
        .join("server.toml")
}
