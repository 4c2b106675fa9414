use crate::config::*;

/// Create test network configuration
pub fn testnet_config() -> WebwalletConfig {
    let mut webwallet = ContainerConfig {
        network: "iridium-testnet".to_string(),
        ..Default::default()
    };
    webwallet.satellite.command.push("--testnet".to_string());

    WebwalletConfig {
        walletd: WalletdConfig {
            network: WalletdNetworkProperties::testnet(),
        },
        mongo: MongoConfig {
            database: "webwallet-testnet".to_string(),
            ..Default::default()
        },
        webwallet,
        ..Default::default()
    }
}
