//! Flat key-value property sources
//!
//! Every configuration layer (defaults, file, environment, command line) is
//! reduced to a [`PropertySource`]: an ordered map from fully-qualified dotted
//! keys such as `walletd.network.name` to their textual values. Layers are
//! merged key by key and the result is bound into typed structures through
//! [`BindProperties`].

pub mod bind;

pub use bind::{bind, BindProperties};

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Separator used when a list is stored under a single key.
pub const LIST_SEPARATOR: char = ',';

/// Escape character for separators and backslashes inside list items
const LIST_ESCAPE: char = '\\';

/// Encode list items under one key. Separators inside an item are escaped.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push(LIST_SEPARATOR);
        }
        for c in item.as_ref().chars() {
            if c == LIST_SEPARATOR || c == LIST_ESCAPE {
                joined.push(LIST_ESCAPE);
            }
            joined.push(c);
        }
    }
    joined
}

/// Decode a value written by [`join_list`]. Items are kept verbatim and an
/// empty value is an empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            LIST_ESCAPE => current.push(chars.next().unwrap_or(LIST_ESCAPE)),
            LIST_SEPARATOR => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);
    items
}

/// Normalise a property key. Lookups are case-insensitive.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Ordered map of dotted configuration keys to string values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySource {
    values: BTreeMap<String, String>,
}

impl PropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.values.insert(normalize_key(key.as_ref()), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Keys below `prefix`, with the prefix and its trailing dot stripped
    pub fn with_prefix(&self, prefix: &str) -> PropertySource {
        let prefix = format!("{}.", normalize_key(prefix));
        self.values
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect()
    }

    /// Layer `other` on top of this source. Keys present in both take the value from `other`.
    pub fn merge(&mut self, other: PropertySource) {
        self.values.extend(other.values);
    }

    pub fn merged(mut self, other: PropertySource) -> Self {
        self.merge(other);
        self
    }

    /// Keys that were added, removed or changed between `self` and `other`, sorted
    pub fn changed_keys(&self, other: &PropertySource) -> Vec<String> {
        let mut changed: Vec<String> = self
            .values
            .iter()
            .filter(|(k, v)| other.values.get(*k) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect();

        changed.extend(
            other
                .values
                .keys()
                .filter(|k| !self.values.contains_key(*k))
                .cloned(),
        );

        changed.sort();
        changed
    }

    /// Parse the value at `key`, if present
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::invalid_value(normalize_key(key), raw)),
            None => Ok(None),
        }
    }

    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        match self.get(key) {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(ConfigError::invalid_value(normalize_key(key), raw)),
            },
            None => Ok(None),
        }
    }

    /// Split a comma-separated value into its items. `\,` is a literal comma.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(split_list)
    }

    /// Flatten a TOML document into dotted keys
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let table: toml::Table = toml::from_str(content)?;
        Ok(Self::from_toml_value(&toml::Value::Table(table)))
    }

    pub fn from_toml_value(value: &toml::Value) -> Self {
        let mut source = Self::new();
        flatten_toml(&mut source, "", value);
        source
    }

    /// Flatten a JSON document into dotted keys
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        Ok(Self::from_json_value(&value))
    }

    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut source = Self::new();
        flatten_json(&mut source, "", value);
        source
    }

    /// Parse command-line `key=value` overrides
    pub fn from_overrides<I, S>(overrides: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = Self::new();
        for item in overrides {
            let item = item.as_ref();
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidOverride(item.to_string()))?;
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidOverride(item.to_string()));
            }
            source.insert(key, value.trim());
        }
        Ok(source)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for PropertySource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (k, v) in iter {
            source.insert(k, v);
        }
        source
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn flatten_toml(source: &mut PropertySource, prefix: &str, value: &toml::Value) {
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                flatten_toml(source, &join_key(prefix, k), v);
            }
        }
        toml::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(toml_scalar).collect();
            source.insert(prefix, join_list(&items));
        }
        scalar => {
            source.insert(prefix, toml_scalar(scalar));
        }
    }
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        other => other.to_string(),
    }
}

fn flatten_json(source: &mut PropertySource, prefix: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                flatten_json(source, &join_key(prefix, k), v);
            }
        }
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(json_scalar).collect();
            source.insert(prefix, join_list(&items));
        }
        serde_json::Value::Null => {}
        scalar => {
            source.insert(prefix, json_scalar(scalar));
        }
    }
}

fn json_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut source = PropertySource::new();
        source.insert("Walletd.Network.NAME", "testnet");

        assert_eq!(source.get("walletd.network.name"), Some("testnet"));
        assert!(source.contains_key("WALLETD.NETWORK.NAME"));
    }

    #[test]
    fn test_with_prefix_strips_namespace() {
        let source: PropertySource = [
            ("walletd.network.name", "mainnet"),
            ("walletd.networkish", "ignored"),
            ("server.address", ":8080"),
        ]
        .into_iter()
        .collect();

        let network = source.with_prefix("walletd.network");
        assert_eq!(network.len(), 1);
        assert_eq!(network.get("name"), Some("mainnet"));
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let mut base: PropertySource = [("a.b", "1"), ("a.c", "2")].into_iter().collect();
        base.merge([("a.c", "3")].into_iter().collect());

        assert_eq!(base.get("a.b"), Some("1"));
        assert_eq!(base.get("a.c"), Some("3"));
    }

    #[test]
    fn test_toml_flattening() {
        let source = PropertySource::from_toml_str(
            r#"
[walletd.network]
name = "testnet"

[webwallet]
internal_resolver = true

[webwallet.satellite]
command = ["walletd", "--rpc-bind-ip=0.0.0.0"]
rpc_port = 14007

[webwallet.satellite.labels]
"cash.ird.webwallet" = "satellite"
"#,
        )
        .unwrap();

        assert_eq!(source.get("walletd.network.name"), Some("testnet"));
        assert_eq!(source.get("webwallet.internal_resolver"), Some("true"));
        assert_eq!(source.get("webwallet.satellite.rpc_port"), Some("14007"));
        assert_eq!(
            source.get("webwallet.satellite.command"),
            Some("walletd,--rpc-bind-ip=0.0.0.0")
        );
        assert_eq!(
            source.get("webwallet.satellite.labels.cash.ird.webwallet"),
            Some("satellite")
        );
    }

    #[test]
    fn test_json_flattening_skips_null() {
        let source = PropertySource::from_json_str(
            r#"{"walletd": {"network": {"name": "mainnet"}}, "mongo": {"address": null}}"#,
        )
        .unwrap();

        assert_eq!(source.get("walletd.network.name"), Some("mainnet"));
        assert!(!source.contains_key("mongo.address"));
    }

    #[test]
    fn test_overrides() {
        let source =
            PropertySource::from_overrides(["walletd.network.name=testnet", "server.address=:9090"])
                .unwrap();
        assert_eq!(source.get("walletd.network.name"), Some("testnet"));
        assert_eq!(source.get("server.address"), Some(":9090"));

        // Values may themselves contain '='
        let source = PropertySource::from_overrides(["mongo.address=mongodb://a?x=1"]).unwrap();
        assert_eq!(source.get("mongo.address"), Some("mongodb://a?x=1"));

        let err = PropertySource::from_overrides(["walletd.network.name"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride(_)));

        let err = PropertySource::from_overrides(["=value"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride(_)));
    }

    #[test]
    fn test_typed_getters() {
        let source: PropertySource = [
            ("port", "14007"),
            ("bad_port", "seventy"),
            ("flag", "Yes"),
            ("list", "a,b\\,c, d"),
        ]
        .into_iter()
        .collect();

        assert_eq!(source.get_parsed::<u16>("port").unwrap(), Some(14007));
        assert_eq!(source.get_parsed::<u16>("missing").unwrap(), None);
        assert!(matches!(
            source.get_parsed::<u16>("bad_port"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(source.get_bool("flag").unwrap(), Some(true));
        assert!(source.get_bool("port").is_err());
        assert_eq!(
            source.get_list("list"),
            Some(vec!["a".to_string(), "b,c".to_string(), " d".to_string()])
        );
    }

    #[test]
    fn test_list_items_keep_separators() {
        let source = PropertySource::from_toml_str(
            r#"
[webwallet.satellite]
command = ["walletd", "--seed-node=a:1,b:2", "", "C:\\data"]
"#,
        )
        .unwrap();

        assert_eq!(
            source.get_list("webwallet.satellite.command"),
            Some(vec![
                "walletd".to_string(),
                "--seed-node=a:1,b:2".to_string(),
                String::new(),
                "C:\\data".to_string(),
            ])
        );

        let items = ["sh", "-c", "echo a,b", " padded "];
        assert_eq!(split_list(&join_list(&items)), items);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_changed_keys() {
        let old: PropertySource = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        let new: PropertySource = [("a", "1"), ("b", "20"), ("d", "4")].into_iter().collect();

        assert_eq!(old.changed_keys(&new), vec!["b", "c", "d"]);
        assert!(old.changed_keys(&old.clone()).is_empty());
    }
}
