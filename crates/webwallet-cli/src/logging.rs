use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt, EnvFilter};
use webwallet_config::LogFormat;

/// Build a subscriber writing to `writer`. `RUST_LOG` wins over `level` when set.
pub fn subscriber<W>(
    level: &str,
    format: LogFormat,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => Box::new(registry.with(fmt::layer().json().with_writer(writer))),
        LogFormat::Compact => Box::new(registry.with(fmt::layer().compact().with_writer(writer))),
        LogFormat::Text => Box::new(registry.with(fmt::layer().with_writer(writer))),
    }
}

/// Install the global subscriber on stderr. Fails if one is already set.
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(level, format, std::io::stderr))?;
    Ok(())
}
