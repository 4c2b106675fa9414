//! Configuration structures and types
pub mod container;
pub mod logging;
pub mod mongo;
pub mod server;
pub mod walletd;
pub mod webwallet;

// Re-export main config types
pub use container::{ContainerConfig, SatelliteConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use mongo::MongoConfig;
pub use server::ServerConfig;
pub use walletd::{WalletdConfig, WalletdNetworkProperties};
pub use webwallet::WebwalletConfig;
