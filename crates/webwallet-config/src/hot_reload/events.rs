use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{error, info, warn};

/// Types of configuration events that can occur
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigEventType {
    /// Configuration file was modified
    FileModified,
    /// Configuration was successfully reloaded
    ReloadComplete,
    /// Configuration reload failed
    ReloadFailed,
    /// Specific configuration value changed
    ConfigChanged,
    /// File watcher started
    WatcherStarted,
    /// File watcher stopped
    WatcherStopped,
    /// File watcher error occurred
    WatcherError,
}

impl fmt::Display for ConfigEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigEventType::FileModified => write!(f, "file_modified"),
            ConfigEventType::ReloadComplete => write!(f, "reload_complete"),
            ConfigEventType::ReloadFailed => write!(f, "reload_failed"),
            ConfigEventType::ConfigChanged => write!(f, "config_changed"),
            ConfigEventType::WatcherStarted => write!(f, "watcher_started"),
            ConfigEventType::WatcherStopped => write!(f, "watcher_stopped"),
            ConfigEventType::WatcherError => write!(f, "watcher_error"),
        }
    }
}

/// Configuration event containing details about what changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEvent {
    /// Type of event that occurred
    pub event_type: ConfigEventType,
    /// File the event concerns (if applicable)
    pub path: Option<PathBuf>,
    /// Configuration key that changed (if applicable)
    pub key: Option<String>,
    /// Previous value (if applicable)
    pub old_value: Option<String>,
    /// New value, or the error message for failures
    pub new_value: Option<String>,
    /// When the event occurred
    pub timestamp: SystemTime,
}

impl ConfigEvent {
    pub fn new(event_type: ConfigEventType) -> Self {
        Self {
            event_type,
            path: None,
            key: None,
            old_value: None,
            new_value: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn config_changed(
        key: String,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            key: Some(key),
            old_value,
            new_value,
            ..Self::new(ConfigEventType::ConfigChanged)
        }
    }

    pub fn file_modified(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::new(ConfigEventType::FileModified)
        }
    }

    pub fn reload_complete() -> Self {
        Self::new(ConfigEventType::ReloadComplete)
    }

    pub fn reload_failed(error: String) -> Self {
        Self {
            new_value: Some(error),
            ..Self::new(ConfigEventType::ReloadFailed)
        }
    }

    pub fn watcher_started(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::new(ConfigEventType::WatcherStarted)
        }
    }

    pub fn watcher_stopped() -> Self {
        Self::new(ConfigEventType::WatcherStopped)
    }

    pub fn watcher_error(error: String) -> Self {
        Self {
            new_value: Some(error),
            ..Self::new(ConfigEventType::WatcherError)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.event_type,
            ConfigEventType::ReloadFailed | ConfigEventType::WatcherError
        )
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "<unset>".to_string());
        match self.event_type {
            ConfigEventType::FileModified | ConfigEventType::WatcherStarted => match &self.path {
                Some(path) => format!("{} {}", self.event_type, path.display()),
                None => self.event_type.to_string(),
            },
            ConfigEventType::ConfigChanged => format!(
                "{} changed: {} -> {}",
                self.key.as_deref().unwrap_or("?"),
                value(&self.old_value),
                value(&self.new_value)
            ),
            ConfigEventType::ReloadFailed | ConfigEventType::WatcherError => {
                format!("{}: {}", self.event_type, value(&self.new_value))
            }
            _ => self.event_type.to_string(),
        }
    }

    /// Emit this event through `tracing` at a level matching its type
    pub fn log(&self) {
        match self.event_type {
            ConfigEventType::ReloadFailed | ConfigEventType::WatcherError => {
                error!(event = %self.event_type, "{}", self.description())
            }
            ConfigEventType::WatcherStopped => {
                warn!(event = %self.event_type, "{}", self.description())
            }
            _ => info!(event = %self.event_type, "{}", self.description()),
        }
    }
}

impl fmt::Display for ConfigEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
