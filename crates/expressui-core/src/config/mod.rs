//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional file merged with `EXPRESSUI__`-prefixed environment
//! variables. Each sub-module represents a logical configuration section.

pub mod logging;
pub mod security;
pub mod store;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::logging::LoggingConfig;
pub use self::security::SecurityConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Password and authentication settings.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Security data store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a file path (extension optional, file optional).
    ///
    /// Environment variables prefixed with `EXPRESSUI__` override file values,
    /// e.g. `EXPRESSUI__LOGGING__LEVEL=debug`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        debug!(path, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("EXPRESSUI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
