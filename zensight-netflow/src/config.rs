//! NetFlow codec configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::packet::Version;

/// Complete codec configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetFlowConfig {
    /// Packet decoding settings.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Packet decoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Versions accepted by the decoder.
    #[serde(default = "default_versions")]
    pub versions: Vec<Version>,

    /// Maximum records per packet; defaults to the protocol limit per version.
    #[serde(default)]
    pub max_records: Option<u16>,

    /// Whether bytes after the last announced record are tolerated.
    #[serde(default = "default_true")]
    pub allow_trailing_bytes: bool,
}

fn default_versions() -> Vec<Version> {
    Version::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            versions: default_versions(),
            max_records: None,
            allow_trailing_bytes: true,
        }
    }
}

impl DecoderConfig {
    /// Whether packets of `version` should be decoded.
    pub fn accepts(&self, version: Version) -> bool {
        self.versions.contains(&version)
    }

    /// Record limit for `version`.
    pub fn max_records_for(&self, version: Version) -> u16 {
        self.max_records.unwrap_or_else(|| version.max_records())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl NetFlowConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.decoder.versions.is_empty() {
            return Err(Error::config("At least one NetFlow version must be enabled"));
        }

        if self.decoder.max_records == Some(0) {
            return Err(Error::config("max_records must be greater than zero"));
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}
