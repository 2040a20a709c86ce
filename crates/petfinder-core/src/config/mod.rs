//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable naming the config overlay (`config/{env}.toml`).
pub const ENV_VAR: &str = "PETFINDER_ENV";
/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_VAR: &str = "PETFINDER_CONFIG_DIR";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Image storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PETFINDER_`. The directory
    /// defaults to `config` and can be moved with `PETFINDER_CONFIG_DIR`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let dir = std::env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&dir, env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PETFINDER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// Returns human-readable warnings for settings that are legal but
    /// unsafe outside development.
    pub fn validate(&self) -> Result<Vec<String>, AppError> {
        let mut warnings = Vec::new();

        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.auth.jwt_secret == auth::DEFAULT_JWT_SECRET {
            warnings.push("auth.jwt_secret is the shipped placeholder".to_string());
        }
        if self.auth.jwt_ttl_hours == 0 {
            return Err(AppError::configuration("auth.jwt_ttl_hours must be positive"));
        }
        if self.auth.password_min_score > 4 {
            return Err(AppError::configuration(
                "auth.password_min_score must be between 0 and 4",
            ));
        }

        match self.database.provider.to_lowercase().as_str() {
            "postgres" => {}
            "memory" => warnings.push("database.provider = memory loses all data on restart".to_string()),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider '{other}'"
                )));
            }
        }

        match self.cache.provider.to_lowercase().as_str() {
            "memory" | "redis" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider '{other}'"
                )));
            }
        }

        match self.storage.provider.to_lowercase().as_str() {
            "local" => {}
            "s3" => {
                if self.storage.s3.bucket.is_empty() {
                    return Err(AppError::configuration("storage.s3.bucket is required"));
                }
                if self.storage.s3.public_url.is_empty() {
                    return Err(AppError::configuration("storage.s3.public_url is required"));
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider '{other}'"
                )));
            }
        }

        if self.storage.max_images_per_listing == 0 {
            return Err(AppError::configuration(
                "storage.max_images_per_listing must be at least 1",
            ));
        }
        if self.storage.allowed_mime_types.is_empty() {
            return Err(AppError::configuration(
                "storage.allowed_mime_types must not be empty",
            ));
        }

        Ok(warnings)
    }
}
