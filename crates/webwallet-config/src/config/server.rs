use crate::error::{ConfigError, ConfigResult};
use crate::properties::{BindProperties, PropertySource};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, either `host:port` or `:port`
    pub address: String,

    /// Directory the web frontend is served from
    pub static_location: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            static_location: "./static".to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listen address. A bare `:port` listens on all interfaces.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let address = self.address.trim();
        let candidate = if address.starts_with(':') {
            format!("0.0.0.0{}", address)
        } else {
            address.to_string()
        };

        candidate
            .parse()
            .map_err(|_| ConfigError::invalid_value(Self::key("address"), &self.address))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Server address cannot be empty".to_string(),
            ));
        }

        if self.static_location.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Server static location cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl BindProperties for ServerConfig {
    const PREFIX: &'static str = "server";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(address) = source.get(&Self::key("address")) {
            self.address = address.to_string();
        }
        if let Some(location) = source.get(&Self::key("static_location")) {
            self.static_location = location.to_string();
        }
        Ok(())
    }
}
