use crate::networks::NetworkType;
use crate::properties::{BindProperties, PropertySource};
use crate::ConfigResult;
use serde::{Deserialize, Serialize};

use super::*;

/// Main configuration structure for the webwallet server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebwalletConfig {
    /// Wallet daemon settings
    pub walletd: WalletdConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Persistence settings
    pub mongo: MongoConfig,

    /// Satellite container settings
    pub webwallet: ContainerConfig,

    /// Logging configuration
    pub log: LoggingConfig,
}

impl WebwalletConfig {
    /// Create a new configuration with defaults for the specified network
    pub fn new_for_network(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Devnet => crate::networks::devnet_config(),
            NetworkType::Testnet => crate::networks::testnet_config(),
            NetworkType::Mainnet => crate::networks::mainnet_config(),
        }
    }

    /// Network the wallet daemons target
    pub fn network(&self) -> &WalletdNetworkProperties {
        &self.walletd.network
    }

    /// Flatten this configuration into dotted keys
    pub fn to_properties(&self) -> ConfigResult<PropertySource> {
        let value = serde_json::to_value(self)?;
        Ok(PropertySource::from_json_value(&value))
    }

    /// Every leaf key the configuration tree understands
    pub fn known_keys() -> Vec<String> {
        Self::default()
            .to_properties()
            .map(|props| props.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Validate the typed sections.
    ///
    /// The walletd network name is not checked. Any value, including an
    /// empty one, is passed through to the daemon as bound.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.mongo.validate()?;
        self.webwallet.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

impl BindProperties for WebwalletConfig {
    const PREFIX: &'static str = "";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        self.walletd.bind(source)?;
        self.server.bind(source)?;
        self.mongo.bind(source)?;
        self.webwallet.bind(source)?;
        self.log.bind(source)?;
        Ok(())
    }

    fn key(field: &str) -> String {
        field.to_string()
    }
}
