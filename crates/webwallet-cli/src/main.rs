//! Command-line access to the webwallet server configuration.

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webwallet_config::{ConfigLoader, LoadedConfig, LogFormat, NetworkType, PropertySource};

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "webwallet-config")]
#[command(about = "Inspect and watch the Iridium webwallet server configuration")]
struct Cli {
    /// Config file to use instead of searching /etc/iridium, ~/.iridium and .
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override a configuration key, e.g. --set walletd.network.name=testnet
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,

    /// Start from a network preset (mainnet, testnet, devnet)
    #[arg(long, global = true)]
    network: Option<NetworkType>,

    /// Log level or filter, overriding log.level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
        format: OutputFormat,
    },
    /// Print the resolved value of one key
    Get { key: String },
    /// Print the walletd network name
    Network,
    /// Check the resolved configuration
    Validate,
    /// Reload the configuration whenever its file changes
    Watch,
}

impl Cli {
    fn loader(&self) -> Result<ConfigLoader> {
        let mut loader = ConfigLoader::new()
            .with_process_env()
            .with_overrides(PropertySource::from_overrides(&self.overrides)?);

        if let Some(path) = &self.config {
            loader = loader.with_file(path);
        }
        if let Some(network) = self.network {
            loader = loader.with_network(network);
        }

        Ok(loader)
    }
}

/// Load the configuration with logging installed before the loader runs.
///
/// `install` receives the resolved level and format; its return value (a
/// guard, or nothing for the global subscriber) is handed back.
async fn load_with_logging<F, G>(
    cli: &Cli,
    loader: &ConfigLoader,
    install: F,
) -> Result<(G, LoadedConfig)>
where
    F: FnOnce(&str, LogFormat) -> Result<G>,
{
    // No subscriber yet, so this pass only resolves the log section
    let log = loader.load().await?.config.log.clone();
    let level = cli.log_level.clone().unwrap_or(log.level);
    let guard = install(&level, log.format)?;

    let loaded = loader.load().await?;
    Ok((guard, loaded))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = cli.loader()?;
    let ((), loaded) = load_with_logging(&cli, &loader, logging::init_logging).await?;

    match cli.command {
        Commands::Show { format } => commands::show(&loaded, format)?,
        Commands::Get { key } => commands::get(&loaded, &key)?,
        Commands::Network => commands::network(&loaded),
        Commands::Validate => commands::validate(&loaded)?,
        Commands::Watch => commands::watch(loader, loaded).await?,
    }

    Ok(())
}
