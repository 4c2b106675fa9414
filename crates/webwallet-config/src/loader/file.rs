use crate::properties::PropertySource;
use crate::{ConfigError, ConfigResult, WebwalletConfig};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Extensions tried, in order, when searching for a config file by name
pub const CONFIG_EXTENSIONS: &[&str] = &["toml", "json"];

/// File-based configuration loader
pub struct FileLoader;

impl FileLoader {
    /// Read a TOML file into a property source
    pub async fn read_toml<P: AsRef<Path>>(path: P) -> ConfigResult<PropertySource> {
        let content = fs::read_to_string(path.as_ref()).await?;
        PropertySource::from_toml_str(&content)
    }

    /// Read a JSON file into a property source
    pub async fn read_json<P: AsRef<Path>>(path: P) -> ConfigResult<PropertySource> {
        let content = fs::read_to_string(path.as_ref()).await?;
        PropertySource::from_json_str(&content)
    }

    /// Auto-detect file format and read the file
    pub async fn read_auto<P: AsRef<Path>>(path: P) -> ConfigResult<PropertySource> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::read_toml(path).await,
            Some("json") => Self::read_json(path).await,
            Some(ext) => Err(ConfigError::InvalidFormat(format!(
                "Unsupported file extension: {}",
                ext
            ))),
            None => {
                // Try TOML first, then JSON
                match Self::read_toml(path).await {
                    Ok(props) => Ok(props),
                    Err(toml_err) => {
                        debug!(path = %path.display(), error = %toml_err, "Not TOML, trying JSON");
                        Self::read_json(path).await
                    }
                }
            }
        }
    }

    /// Save configuration to a TOML file
    pub async fn save_toml<P: AsRef<Path>>(config: &WebwalletConfig, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(config)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub async fn save_json<P: AsRef<Path>>(config: &WebwalletConfig, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Find `<name>.<ext>` in the first search path that has one
    pub fn find_config_file(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
        for dir in search_paths {
            for ext in CONFIG_EXTENSIONS {
                let candidate = dir.join(format!("{}.{}", name, ext));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// `/etc/iridium`, then `$HOME/.iridium`, then the working directory
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/iridium")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".iridium"));
        }
        paths.push(PathBuf::from("."));
        paths
    }
}
