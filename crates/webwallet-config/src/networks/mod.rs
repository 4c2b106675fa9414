//! Network-specific configuration presets

pub mod devnet;
pub mod mainnet;
pub mod testnet;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Devnet,
    Testnet,
    Mainnet,
}

impl NetworkType {
    /// Canonical name as bound to `walletd.network.name`
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Devnet => "devnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NetworkType {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "devnet" | "dev" => Ok(NetworkType::Devnet),
            "testnet" | "test" => Ok(NetworkType::Testnet),
            "mainnet" | "main" => Ok(NetworkType::Mainnet),
            _ => Err(crate::error::ConfigError::InvalidNetwork(s.to_string())),
        }
    }
}

// Re-export network configurations
pub use devnet::devnet_config;
pub use mainnet::mainnet_config;
pub use testnet::testnet_config;
