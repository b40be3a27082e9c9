//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file pair plus `QUILL__`-prefixed environment
//! variables. Each sub-module represents a logical configuration section.

pub mod extensions;
pub mod host;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::extensions::ExtensionsConfig;
use self::host::HostConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Host process settings.
    #[serde(default)]
    pub host: HostConfig,
    /// Extension runtime settings.
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `QUILL`
    /// (e.g. `QUILL__LOGGING__LEVEL=debug`). Every source is optional.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration using an explicit base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("QUILL")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extensions.disabled")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
