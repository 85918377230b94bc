//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::{Error, Result};

/// Install a global tracing subscriber configured by `config.logging`
///
/// An unparsable filter directive falls back to `info`. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = &config.logging.level;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info")));

    let installed = match config.logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| Error::Tracing(e.to_string()))?;

    tracing::info!("Tracing initialized with filter: {}", log_level);

    Ok(())
}
