//! Tracing subscriber setup for host applications.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::logging::LoggingConfig;
use crate::error::HookError;

/// Install a global `tracing` subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if the level
/// is not a valid filter directive or a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<(), HookError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            HookError::configuration(format!("Invalid log level '{}': {e}", config.level))
        })?,
    };

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| HookError::configuration(format!("Failed to install subscriber: {e}")))
}
