use crate::properties::PropertySource;
use crate::WebwalletConfig;
use std::env;
use tracing::debug;

/// Environment variable prefixes that map onto configuration keys
pub const ENV_PREFIXES: &[&str] = &["WALLETD_", "WEBWALLET_", "SERVER_", "MONGO_", "LOG_"];

/// Key namespaces whose entries are free-form (map keys chosen by the user)
const OPEN_NAMESPACES: &[&str] = &["webwallet.satellite.labels."];

/// Environment variable-based configuration loader
///
/// `WALLETD_NETWORK_NAME=testnet` binds `walletd.network.name = testnet`.
/// Underscores are ambiguous (`SERVER_STATIC_LOCATION` is
/// `server.static_location`, not `server.static.location`), so variables are
/// matched against the known keys of [`WebwalletConfig`] first.
pub struct EnvLoader;

impl EnvLoader {
    /// Property source built from the process environment
    pub fn properties_from_env() -> PropertySource {
        Self::properties_from_vars(env::vars())
    }

    /// Property source built from an explicit set of variables
    pub fn properties_from_vars<I, K, V>(vars: I) -> PropertySource
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let known_keys = WebwalletConfig::known_keys();
        let mut source = PropertySource::new();

        for (name, value) in vars {
            let name = name.as_ref();
            match Self::property_key(name, &known_keys) {
                Some(key) => {
                    debug!(variable = name, key = %key, "Environment override detected");
                    source.insert(key, value);
                }
                None => {
                    if Self::has_prefix(name) {
                        debug!(variable = name, "Ignoring unrecognised environment variable");
                    }
                }
            }
        }

        source
    }

    /// Map an environment variable name to a configuration key
    pub fn property_key(name: &str, known_keys: &[String]) -> Option<String> {
        if !Self::has_prefix(name) {
            return None;
        }

        let lowered = name.to_lowercase();
        if let Some(key) = known_keys
            .iter()
            .find(|key| key.replace('.', "_") == lowered)
        {
            return Some(key.clone());
        }

        let dotted = lowered.replace('_', ".");
        OPEN_NAMESPACES
            .iter()
            .any(|ns| dotted.starts_with(ns) && dotted.len() > ns.len())
            .then_some(dotted)
    }

    /// Environment variable name for a configuration key
    pub fn env_var_name(key: &str) -> String {
        key.to_uppercase().replace('.', "_")
    }

    fn has_prefix(name: &str) -> bool {
        let upper = name.to_uppercase();
        ENV_PREFIXES.iter().any(|prefix| upper.starts_with(prefix))
    }
}
