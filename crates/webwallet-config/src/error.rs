use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid override '{0}', expected key=value")]
    InvalidOverride(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
