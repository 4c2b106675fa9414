//! Container orchestration settings for wallet satellites
//!
//! Each wallet runs its own `walletd` in a Docker container (a "satellite").
//! These settings decide which image is started, how it is labelled, which
//! Docker network it joins and how the server reaches its JSON-RPC port.

use crate::error::{ConfigError, ConfigResult};
use crate::properties::{BindProperties, PropertySource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings under `webwallet.*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Docker network satellites are attached to
    pub network: String,

    /// Reach satellites by container name through Docker's internal DNS
    /// instead of inspecting their IP address
    pub internal_resolver: bool,

    pub satellite: SatelliteConfig,
}

/// Settings under `webwallet.satellite.*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Docker image running walletd
    pub image: String,

    /// Container command; the wallet password flag is appended per container
    pub command: Vec<String>,

    /// walletd JSON-RPC port inside the container
    pub rpc_port: u16,

    /// Labels put on satellite containers and volumes, and used to find them again
    pub labels: BTreeMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            network: "iridium".to_string(),
            internal_resolver: false,
            satellite: SatelliteConfig::default(),
        }
    }
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            image: "iridiumdev/walletd:latest".to_string(),
            command: vec![
                "walletd".to_string(),
                "--rpc-bind-ip=0.0.0.0".to_string(),
                "--container-file=/data/wallet".to_string(),
            ],
            rpc_port: 14007,
            labels: BTreeMap::new(),
        }
    }
}

impl ContainerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Docker network cannot be empty".to_string(),
            ));
        }
        self.satellite.validate()
    }
}

impl SatelliteConfig {
    /// Command for a container protecting its wallet file with `password`
    pub fn command_with_password(&self, password: &str) -> Vec<String> {
        let mut command = self.command.clone();
        command.push(format!("--container-password={}", password));
        command
    }

    /// JSON-RPC endpoint of a satellite reachable at `host`
    pub fn rpc_endpoint(&self, host: &str) -> String {
        if host.contains(':') && !host.starts_with('[') {
            format!("http://[{}]:{}/json_rpc", host, self.rpc_port)
        } else {
            format!("http://{}:{}/json_rpc", host, self.rpc_port)
        }
    }

    /// `key=value` label filters
    pub fn label_filters(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.image.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Satellite image cannot be empty".to_string(),
            ));
        }

        if self.rpc_port == 0 {
            return Err(ConfigError::ValidationFailed(
                "Satellite RPC port cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl BindProperties for ContainerConfig {
    const PREFIX: &'static str = "webwallet";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(network) = source.get(&Self::key("network")) {
            self.network = network.to_string();
        }
        if let Some(internal) = source.get_bool(&Self::key("internal_resolver"))? {
            self.internal_resolver = internal;
        }
        self.satellite.bind(source)
    }
}

impl BindProperties for SatelliteConfig {
    const PREFIX: &'static str = "webwallet.satellite";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(image) = source.get(&Self::key("image")) {
            self.image = image.to_string();
        }
        if let Some(command) = source.get_list(&Self::key("command")) {
            self.command = command;
        }
        if let Some(port) = source.get_parsed::<u16>(&Self::key("rpc_port"))? {
            self.rpc_port = port;
        }

        let labels = source.with_prefix(&Self::key("labels"));
        if !labels.is_empty() {
            self.labels = labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::bind;

    #[test]
    fn test_bind_satellite() {
        let source: PropertySource = [
            ("webwallet.network", "wallets"),
            ("webwallet.internal_resolver", "true"),
            ("webwallet.satellite.image", "iridiumdev/walletd:0.2"),
            ("webwallet.satellite.command", "walletd,--testnet"),
            ("webwallet.satellite.rpc_port", "17070"),
            ("webwallet.satellite.labels.cash.ird.webwallet", "satellite"),
            ("webwallet.satellite.labels.env", "staging"),
        ]
        .into_iter()
        .collect();

        let config: ContainerConfig = bind(&source).unwrap();
        assert_eq!(config.network, "wallets");
        assert!(config.internal_resolver);
        assert_eq!(config.satellite.image, "iridiumdev/walletd:0.2");
        assert_eq!(config.satellite.command, vec!["walletd", "--testnet"]);
        assert_eq!(config.satellite.rpc_port, 17070);
        assert_eq!(
            config.satellite.label_filters(),
            vec!["cash.ird.webwallet=satellite", "env=staging"]
        );
    }

    #[test]
    fn test_bind_invalid_port() {
        let source: PropertySource =
            [("webwallet.satellite.rpc_port", "70000")].into_iter().collect();
        let err = bind::<SatelliteConfig>(&source).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "webwallet.satellite.rpc_port"
        ));
    }

    #[test]
    fn test_bind_invalid_bool() {
        let source: PropertySource =
            [("webwallet.internal_resolver", "maybe")].into_iter().collect();
        assert!(bind::<ContainerConfig>(&source).is_err());
    }

    #[test]
    fn test_rpc_endpoint() {
        let satellite = SatelliteConfig::default();
        assert_eq!(
            satellite.rpc_endpoint("5c3a0f"),
            "http://5c3a0f:14007/json_rpc"
        );
        assert_eq!(
            satellite.rpc_endpoint("172.18.0.4"),
            "http://172.18.0.4:14007/json_rpc"
        );
        assert_eq!(satellite.rpc_endpoint("fd00::4"), "http://[fd00::4]:14007/json_rpc");
    }

    #[test]
    fn test_command_with_password() {
        let satellite = SatelliteConfig::default();
        let command = satellite.command_with_password("hunter2");
        assert_eq!(command.last().unwrap(), "--container-password=hunter2");
        assert_eq!(command.len(), satellite.command.len() + 1);
    }
}
