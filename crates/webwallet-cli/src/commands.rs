//! CLI subcommand implementations.

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing::warn;
use webwallet_config::{
    ConfigEventType, ConfigHandle, ConfigLoader, HotReloadManager, LoadedConfig, WebwalletConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

pub fn render_config(config: &WebwalletConfig, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Toml => toml::to_string_pretty(config)?,
        OutputFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    })
}

pub fn show(loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
    print!("{}", render_config(&loaded.config, format)?);
    Ok(())
}

pub fn lookup<'a>(loaded: &'a LoadedConfig, key: &str) -> Result<&'a str> {
    loaded
        .get(key)
        .ok_or_else(|| anyhow!("unknown configuration key: {key}"))
}

pub fn get(loaded: &LoadedConfig, key: &str) -> Result<()> {
    println!("{}", lookup(loaded, key)?);
    Ok(())
}

pub fn network_name(config: &WebwalletConfig) -> String {
    let network = config.network();
    if network.is_unset() {
        "<unset>".to_string()
    } else {
        network.name().to_string()
    }
}

pub fn network(loaded: &LoadedConfig) {
    println!("{}", network_name(&loaded.config));
}

pub fn validate(loaded: &LoadedConfig) -> Result<()> {
    loaded.config.validate()?;

    let network = loaded.config.network();
    if network.is_unset() {
        warn!("walletd.network.name is not set");
    } else if network.network_type().is_none() {
        warn!(name = network.name(), "walletd.network.name is not a well-known network");
    }

    println!("configuration is valid");
    Ok(())
}

/// Print every changed key until interrupted
pub async fn watch(loader: ConfigLoader, loaded: LoadedConfig) -> Result<()> {
    loaded.config.validate()?;

    let handle = ConfigHandle::new(loaded);
    let (manager, mut events) = HotReloadManager::spawn(loader, handle.clone())?;

    println!("watching, network = {}", network_name(&handle.snapshot()));

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) if event.event_type == ConfigEventType::ConfigChanged => {
                        println!("{}", event);
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    manager.stop();
    Ok(())
}
