//! Iridium Webwallet Configuration Management
//!
//! This crate binds the wallet server's hierarchical key-value configuration
//! (files, environment, command-line overrides) into plain typed structures,
//! and can hot-reload them when the backing file changes.

pub mod config;
pub mod error;
pub mod hot_reload;
pub mod loader;
pub mod networks;
pub mod properties;

// Re-exports for convenience
pub use config::*;
pub use hot_reload::*;
pub use loader::*;
pub use properties::{bind, BindProperties, PropertySource};

// Re-export main types
pub use error::{ConfigError, ConfigResult};

// Re-export network presets
pub use networks::{devnet_config, mainnet_config, testnet_config, NetworkType};
