use crate::config::*;

/// Create development network configuration
pub fn devnet_config() -> WebwalletConfig {
    let mut webwallet = ContainerConfig {
        network: "iridium-devnet".to_string(),
        internal_resolver: true,
        ..Default::default()
    };
    webwallet.satellite.command.push("--testnet".to_string());

    WebwalletConfig {
        walletd: WalletdConfig {
            network: WalletdNetworkProperties::devnet(),
        },
        server: ServerConfig {
            address: "127.0.0.1:8080".to_string(),
            ..Default::default()
        },
        mongo: MongoConfig {
            database: "webwallet-dev".to_string(),
            ..Default::default()
        },
        webwallet,
        log: LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        },
    }
}
