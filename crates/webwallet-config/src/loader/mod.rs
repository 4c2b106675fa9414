//! Configuration loading and environment handling

pub mod env;
pub mod file;

// Re-export the loaders that other code expects
pub use env::EnvLoader;
pub use file::FileLoader;

use crate::networks::NetworkType;
use crate::properties::{BindProperties, PropertySource};
use crate::{ConfigError, ConfigResult, WebwalletConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Base name of the configuration file, without extension
pub const CONFIG_NAME: &str = "webwallet";

#[derive(Debug, Clone, Default)]
enum EnvLayer {
    #[default]
    Disabled,
    Process,
    Fixed(PropertySource),
}

/// Layered configuration loader.
///
/// Precedence, lowest first: defaults (or a network preset), config file,
/// environment, command-line overrides.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_name: String,
    search_paths: Vec<PathBuf>,
    explicit_file: Option<PathBuf>,
    network: Option<NetworkType>,
    env: EnvLayer,
    overrides: PropertySource,
}

/// Result of a load: the bound snapshot plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Arc<WebwalletConfig>,
    /// Merged key-value view of every layer
    pub properties: PropertySource,
    /// Config file that was read, if any
    pub source_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_name: CONFIG_NAME.to_string(),
            search_paths: FileLoader::default_search_paths(),
            explicit_file: None,
            network: None,
            env: EnvLayer::Disabled,
            overrides: PropertySource::new(),
        }
    }

    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    /// Replace the directories searched for the config file
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn add_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Use this file instead of searching. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Start from a network preset instead of the plain defaults
    pub fn with_network(mut self, network: NetworkType) -> Self {
        self.network = Some(network);
        self
    }

    /// Read the process environment on every load
    pub fn with_process_env(mut self) -> Self {
        self.env = EnvLayer::Process;
        self
    }

    /// Use a fixed set of environment variables
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.env = EnvLayer::Fixed(EnvLoader::properties_from_vars(vars));
        self
    }

    /// Command-line overrides; they take precedence over everything else
    pub fn with_overrides(mut self, overrides: PropertySource) -> Self {
        self.overrides.merge(overrides);
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// The config file a load would read, if any
    pub fn resolve_file(&self) -> ConfigResult<Option<PathBuf>> {
        match &self.explicit_file {
            Some(path) if path.is_file() => Ok(Some(path.clone())),
            Some(path) => Err(ConfigError::FileNotFound(path.display().to_string())),
            None => Ok(FileLoader::find_config_file(
                &self.config_name,
                &self.search_paths,
            )),
        }
    }

    /// Load and bind the configuration
    pub async fn load(&self) -> ConfigResult<LoadedConfig> {
        let mut config = match self.network {
            Some(network) => WebwalletConfig::new_for_network(network),
            None => WebwalletConfig::default(),
        };
        let mut properties = config.to_properties()?;

        let source_file = self.resolve_file()?;
        match &source_file {
            Some(path) => {
                info!(path = %path.display(), "Using config file");
                properties.merge(FileLoader::read_auto(path).await?);
            }
            None => {
                warn!(
                    name = %self.config_name,
                    search_paths = ?self.search_paths,
                    "No config file found, using defaults"
                );
            }
        }

        match &self.env {
            EnvLayer::Disabled => {}
            EnvLayer::Process => properties.merge(EnvLoader::properties_from_env()),
            EnvLayer::Fixed(env) => properties.merge(env.clone()),
        }

        properties.merge(self.overrides.clone());

        config.bind(&properties)?;

        Ok(LoadedConfig {
            config: Arc::new(config),
            properties,
            source_file,
        })
    }

    /// Load from a single file with no search, environment or overrides
    pub async fn load_file<P: AsRef<Path>>(path: P) -> ConfigResult<LoadedConfig> {
        Self::new()
            .with_search_paths(Vec::new())
            .with_file(path.as_ref())
            .load()
            .await
    }
}

impl LoadedConfig {
    /// Resolved value of a single key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn isolated() -> ConfigLoader {
        ConfigLoader::new().with_search_paths(Vec::new())
    }

    #[tokio::test]
    async fn test_defaults_without_file() {
        let loaded = isolated().load().await.unwrap();

        assert!(loaded.source_file.is_none());
        assert_eq!(*loaded.config, WebwalletConfig::default());
        assert!(loaded.config.network().is_unset());
        assert_eq!(loaded.get("walletd.network.name"), Some(""));
    }

    #[tokio::test]
    async fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = isolated()
            .with_file(dir.path().join("nope.toml"))
            .load()
            .await;
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_precedence() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("webwallet.toml"),
            r#"
[walletd.network]
name = "mainnet"

[server]
address = ":8000"

[mongo]
database = "from-file"
"#,
        )
        .unwrap();

        let loaded = isolated()
            .add_search_path(dir.path())
            .with_env([
                ("WALLETD_NETWORK_NAME", "testnet"),
                ("MONGO_DATABASE", "from-env"),
            ])
            .with_overrides(
                PropertySource::from_overrides(["walletd.network.name=devnet"]).unwrap(),
            )
            .load()
            .await
            .unwrap();

        assert_eq!(
            loaded.source_file.as_deref(),
            Some(dir.path().join("webwallet.toml").as_path())
        );
        assert_eq!(loaded.config.server.address, ":8000");
        assert_eq!(loaded.config.mongo.database, "from-env");
        assert_eq!(loaded.config.network().name(), "devnet");
        assert_eq!(loaded.get("mongo.database"), Some("from-env"));
    }

    #[tokio::test]
    async fn test_network_preset_is_the_lowest_layer() {
        let loaded = isolated()
            .with_network(NetworkType::Testnet)
            .load()
            .await
            .unwrap();
        assert_eq!(loaded.config.network().name(), "testnet");
        assert_eq!(loaded.config.mongo.database, "webwallet-testnet");

        let loaded = isolated()
            .with_network(NetworkType::Testnet)
            .with_env([("WALLETD_NETWORK_NAME", "mainnet")])
            .load()
            .await
            .unwrap();
        assert_eq!(loaded.config.network().name(), "mainnet");
        assert_eq!(loaded.config.mongo.database, "webwallet-testnet");
    }

    #[tokio::test]
    async fn test_malformed_typed_value_fails_load() {
        let loaded = isolated()
            .with_overrides(
                PropertySource::from_overrides(["webwallet.satellite.rpc_port=abc"]).unwrap(),
            )
            .load()
            .await;
        assert!(matches!(loaded, Err(ConfigError::InvalidValue { .. })));
    }
}
