use crate::config::*;

/// Create main network configuration
pub fn mainnet_config() -> WebwalletConfig {
    WebwalletConfig {
        walletd: WalletdConfig {
            network: WalletdNetworkProperties::mainnet(),
        },
        log: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        },
        ..Default::default()
    }
}
