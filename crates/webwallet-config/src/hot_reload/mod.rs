//! Hot reload functionality for configuration changes
//!
//! [`ConfigHandle`] holds the current configuration as an immutable
//! `Arc<WebwalletConfig>` snapshot. Readers clone the `Arc` and keep a
//! consistent view. A reload builds a new snapshot and swaps it in.
//! [`HotReloadManager`] drives reloads from a [`FileWatcher`].

pub mod events;
pub mod watcher;

pub use events::*;
pub use watcher::FileWatcher;

use crate::loader::{ConfigLoader, LoadedConfig};
use crate::properties::PropertySource;
use crate::{ConfigError, ConfigResult, WebwalletConfig};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug)]
struct HandleState {
    config: Arc<WebwalletConfig>,
    properties: PropertySource,
    source_file: Option<PathBuf>,
}

/// Shared, swappable configuration snapshot
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    state: Arc<RwLock<HandleState>>,
}

impl ConfigHandle {
    pub fn new(loaded: LoadedConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(HandleState {
                config: loaded.config,
                properties: loaded.properties,
                source_file: loaded.source_file,
            })),
        }
    }

    /// Current configuration. The returned snapshot never changes.
    pub fn snapshot(&self) -> Arc<WebwalletConfig> {
        Arc::clone(&self.state.read().config)
    }

    pub fn properties(&self) -> PropertySource {
        self.state.read().properties.clone()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.state.read().properties.get(key).map(str::to_string)
    }

    pub fn source_file(&self) -> Option<PathBuf> {
        self.state.read().source_file.clone()
    }

    /// Re-run `loader` and swap in the result.
    ///
    /// Returns the keys whose values changed. On a load or validation error
    /// the current snapshot is kept.
    pub async fn reload(&self, loader: &ConfigLoader) -> ConfigResult<Vec<String>> {
        let loaded = loader.load().await?;
        loaded.config.validate()?;
        Ok(self.replace(loaded))
    }

    /// Swap in an already loaded configuration, returning the changed keys
    pub fn replace(&self, loaded: LoadedConfig) -> Vec<String> {
        let mut state = self.state.write();
        let changed = state.properties.changed_keys(&loaded.properties);

        state.config = loaded.config;
        state.properties = loaded.properties;
        state.source_file = loaded.source_file;

        changed
    }
}

/// Reloads a [`ConfigHandle`] whenever its config file changes
pub struct HotReloadManager {
    watcher: FileWatcher,
    task: JoinHandle<()>,
}

impl HotReloadManager {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// Watch the handle's config file. Events (including per-key changes)
    /// are logged and forwarded to the returned receiver.
    pub fn spawn(
        loader: ConfigLoader,
        handle: ConfigHandle,
    ) -> ConfigResult<(Self, mpsc::UnboundedReceiver<ConfigEvent>)> {
        Self::spawn_with_poll_interval(loader, handle, Self::DEFAULT_POLL_INTERVAL)
    }

    pub fn spawn_with_poll_interval(
        loader: ConfigLoader,
        handle: ConfigHandle,
        poll_interval: Duration,
    ) -> ConfigResult<(Self, mpsc::UnboundedReceiver<ConfigEvent>)> {
        let path = handle.source_file().ok_or_else(|| {
            ConfigError::FileNotFound("no config file in use, nothing to watch".to_string())
        })?;

        let (watch_sender, mut watch_receiver) = mpsc::unbounded_channel();
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        let mut watcher = FileWatcher::new(watch_sender);
        watcher.set_poll_interval(poll_interval);
        watcher.watch_file(&path)?;

        info!(path = %path.display(), "Hot reload enabled");

        let task = tokio::spawn(async move {
            while let Some(event) = watch_receiver.recv().await {
                let modified = event.event_type == ConfigEventType::FileModified;
                forward(&event_sender, event);

                if modified {
                    for event in reload_events(&loader, &handle).await {
                        forward(&event_sender, event);
                    }
                }
            }
            debug!("Hot reload task finished");
        });

        Ok((Self { watcher, task }, event_receiver))
    }

    pub fn watched_files(&self) -> Vec<PathBuf> {
        self.watcher.watched_files()
    }

    pub fn stop(mut self) {
        self.watcher.stop();
        self.task.abort();
    }
}

fn forward(sender: &mpsc::UnboundedSender<ConfigEvent>, event: ConfigEvent) {
    event.log();
    // Nobody listening is fine; the event has been logged
    let _ = sender.send(event);
}

async fn reload_events(loader: &ConfigLoader, handle: &ConfigHandle) -> Vec<ConfigEvent> {
    let before = handle.properties();

    match handle.reload(loader).await {
        Ok(changed) => {
            let after = handle.properties();
            let mut events: Vec<ConfigEvent> = changed
                .into_iter()
                .map(|key| {
                    let old_value = before.get(&key).map(str::to_string);
                    let new_value = after.get(&key).map(str::to_string);
                    ConfigEvent::config_changed(key, old_value, new_value)
                })
                .collect();
            events.push(ConfigEvent::reload_complete());
            events
        }
        Err(e) => vec![ConfigEvent::reload_failed(e.to_string())],
    }
}
