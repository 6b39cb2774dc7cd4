//! Tracing subscriber setup.
//!
//! Logs go to stderr so that hosts embedding the indexer keep
//! stdout for their own protocol traffic.

use crate::core::config::{LogFormat, LoggingConfig};
use crate::core::error::{ChunkdexError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: RUST_LOG wins over the configured level.
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ChunkdexError::ConfigError(format!("Invalid log level '{}': {e}", config.level))
        }),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed or the level is not
/// a valid filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| ChunkdexError::ConfigError(format!("Failed to init logging: {e}")))
}
