//! Configuration management infrastructure.
//!
//! Stores default certificate locations, output format and log level in a
//! TOML file under the user's config directory.

use crate::infra::error::{InspectorError, InspectorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log levels accepted in the configuration file.
const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// How inspection reports are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = InspectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(InspectorError::ConfigurationError(format!(
                "Invalid output format: {other}"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfiguration {
    /// Files or directories inspected when none are given on the command line
    pub certificate_paths: Vec<PathBuf>,

    /// Report rendering
    pub output_format: OutputFormat,

    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,

    /// Whether to print every certificate of the collection, not only the roles
    pub list_certificates: bool,
}

impl Default for InspectorConfiguration {
    fn default() -> Self {
        Self {
            certificate_paths: Vec::new(),
            output_format: OutputFormat::Text,
            log_level: "warn".to_string(),
            list_certificates: false,
        }
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> InspectorResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> InspectorResult<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("certstore-roles").join("config.toml"))
        } else {
            Ok(PathBuf::from("certstore-roles-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> InspectorResult<InspectorConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = InspectorConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load_or_default(&self) -> InspectorResult<InspectorConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(InspectorConfiguration::default())
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> InspectorResult<InspectorConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            InspectorError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: InspectorConfiguration = toml::from_str(&content).map_err(|e| {
            InspectorError::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load the configuration file if there is one.
    ///
    /// `Ok(None)` only when the file does not exist; an unreadable, malformed
    /// or invalid file is an error.
    pub fn load_existing(&self) -> InspectorResult<Option<InspectorConfiguration>> {
        if !self.config_path.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    /// Save configuration to file
    pub fn save(&self, config: &InspectorConfiguration) -> InspectorResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                InspectorError::ConfigurationError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            InspectorError::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            InspectorError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        log::info!("Configuration saved successfully");
        Ok(())
    }

    /// Validate configuration values
    pub fn validate_config(config: &InspectorConfiguration) -> InspectorResult<()> {
        if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
            return Err(InspectorError::ConfigurationError(format!(
                "Invalid log level: {} (expected one of {})",
                config.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if let Some(empty) = config
            .certificate_paths
            .iter()
            .find(|p| p.as_os_str().is_empty())
        {
            return Err(InspectorError::ConfigurationError(format!(
                "Empty certificate path in configuration: {empty:?}"
            )));
        }

        Ok(())
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Export configuration as a portable format
    pub fn export_config(&self, format: ExportFormat) -> InspectorResult<String> {
        let config = self.load_or_default()?;

        match format {
            ExportFormat::Toml => toml::to_string_pretty(&config).map_err(|e| {
                InspectorError::ConfigurationError(format!("TOML export failed: {e}"))
            }),
            ExportFormat::Json => serde_json::to_string_pretty(&config).map_err(|e| {
                InspectorError::ConfigurationError(format!("JSON export failed: {e}"))
            }),
        }
    }
}

/// Configuration export formats
#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Toml,
    Json,
}
