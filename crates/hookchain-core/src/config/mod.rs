//! Configuration schemas.
//!
//! Configuration is deserialized via the `config` crate from an optional TOML
//! file merged with `HOOKCHAIN__`-prefixed environment variables. Every field
//! has a default, so an empty source yields a usable configuration.

pub mod dispatch;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::dispatch::DispatchConfig;
use self::logging::LoggingConfig;

use crate::error::HookError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
    /// Executor settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HookConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables such as
    /// `HOOKCHAIN__DISPATCH__MAX_DEPTH=64` override file values.
    pub fn load(path: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKCHAIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HookError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| HookError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
