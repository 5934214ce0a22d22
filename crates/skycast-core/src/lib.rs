//! Shared foundation for SkyCast: logging setup, configuration and the
//! application-wide error hierarchy.

pub mod config;
pub mod error;

pub use config::{
    ApiConfig, Config, DisplayConfig, RetrySettings, SearchConfig, UnitPreference,
    ValidationResult,
};
pub use error::{AppError, ConfigError, InputError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info"`) is used.
pub fn init(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("SkyCast core initialized");
    Ok(())
}
