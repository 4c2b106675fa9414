use crate::error::{ConfigError, ConfigResult};
use crate::properties::{BindProperties, PropertySource};
use serde::{Deserialize, Serialize};

/// MongoDB connection settings for the wallet and user stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub address: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            address: "localhost:27017".to_string(),
            database: "webwallet".to_string(),
        }
    }
}

impl MongoConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Mongo address cannot be empty".to_string(),
            ));
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Mongo database cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl BindProperties for MongoConfig {
    const PREFIX: &'static str = "mongo";

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()> {
        if let Some(address) = source.get(&Self::key("address")) {
            self.address = address.to_string();
        }
        if let Some(database) = source.get(&Self::key("database")) {
            self.database = database.to_string();
        }
        Ok(())
    }
}
