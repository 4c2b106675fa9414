use crate::networks::NetworkType;
use crate::properties::{BindProperties, PropertySource};
use crate::ConfigResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network the wallet daemon (`walletd`) should target.
///
/// Bound from `walletd.network.name`. The name is taken verbatim: any string,
/// including the empty one, is accepted. When the key is absent the name
/// stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletdNetworkProperties {
    name: String,
}

impl WalletdNetworkProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Currently bound network name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether no network name has been bound
    pub fn is_unset(&self) -> bool {
        self.name.is_empty()
    }

    /// Interpret the name as one of the well-known networks, if it is one
    pub fn network_type(&self) -> Option<NetworkType> {
        self.name.parse().ok()
    }

    pub fn mainnet() -> Self {
        Self::new(NetworkType::Mainnet.as_str())
    }

    pub fn testnet() -> Self {
        Self::new(NetworkType::Testnet.as_str())
    }

    pub fn devnet() -> Self {
        Self::new(NetworkType::Devnet.as_str())
    }
}

impl From<NetworkType> for WalletdNetworkProperties {
    fn from(network: NetworkType) -> Self {
        Self::new(network.as_str())
    }
}

impl fmt::Display for WalletdNetworkProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl BindProperties for WalletdNetworkProperties {
    const PREFIX: &'static str = "walletd.network";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(name) = source.get(&Self::key("name")) {
            self.set_name(name);
        }
        Ok(())
    }
}

/// Settings for the wallet daemons spawned per wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletdConfig {
    pub network: WalletdNetworkProperties,
}

impl BindProperties for WalletdConfig {
    const PREFIX: &'static str = "walletd";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        self.network.bind(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::bind;

    #[test]
    fn test_setter_getter_identity() {
        let mut props = WalletdNetworkProperties::default();
        for value in ["mainnet", "testnet", "", "  spaced  ", "ünïcode-net", "a.b=c"] {
            props.set_name(value);
            assert_eq!(props.name(), value);
        }
    }

    #[test]
    fn test_bind_testnet() {
        let source: PropertySource = [("walletd.network.name", "testnet")].into_iter().collect();
        let props: WalletdNetworkProperties = bind(&source).unwrap();

        assert_eq!(props.name(), "testnet");
        assert_eq!(props.network_type(), Some(NetworkType::Testnet));
    }

    #[test]
    fn test_absent_key_leaves_empty_name() {
        let source: PropertySource = [("walletd.other", "x")].into_iter().collect();
        let props: WalletdNetworkProperties = bind(&source).unwrap();

        assert!(props.is_unset());
        assert_eq!(props.name(), "");
    }

    #[test]
    fn test_absent_key_keeps_existing_value() {
        let mut props = WalletdNetworkProperties::mainnet();
        props.bind(&PropertySource::new()).unwrap();
        assert_eq!(props.name(), "mainnet");
    }

    #[test]
    fn test_unknown_names_are_accepted() {
        let source: PropertySource =
            [("walletd.network.name", "my-private-chain")].into_iter().collect();
        let props: WalletdNetworkProperties = bind(&source).unwrap();

        assert_eq!(props.name(), "my-private-chain");
        assert_eq!(props.network_type(), None);
    }

    #[test]
    fn test_equality_by_name() {
        assert_eq!(
            WalletdNetworkProperties::new("testnet"),
            WalletdNetworkProperties::testnet()
        );
        assert_ne!(
            WalletdNetworkProperties::testnet(),
            WalletdNetworkProperties::mainnet()
        );
    }

    #[test]
    fn test_serde_shape() {
        let props = WalletdNetworkProperties::new("testnet");
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "testnet" }));

        let back: WalletdNetworkProperties = serde_json::from_value(json).unwrap();
        assert_eq!(back, props);
    }
}
