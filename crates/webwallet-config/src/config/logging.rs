use crate::error::{ConfigError, ConfigResult};
use crate::properties::{BindProperties, PropertySource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logging configuration for the webwallet server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or filter directive, e.g. `info` or `webwallet_config=debug`
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured format
    Json,
    /// Compact format for production
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::invalid_value(LoggingConfig::key("format"), s)),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Log level cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl BindProperties for LoggingConfig {
    const PREFIX: &'static str = "log";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(level) = source.get(&Self::key("level")) {
            self.level = level.to_string();
        }
        if let Some(format) = source.get_parsed::<LogFormat>(&Self::key("format"))? {
            self.format = format;
        }
        Ok(())
    }
}
