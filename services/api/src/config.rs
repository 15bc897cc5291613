//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config/api.toml`, then `APP__SECTION__KEY` environment variables.
//! `DATABASE_URL` wins over `database.url` when set.

use std::env;

use common::{database::DatabaseConfig, storage::StorageConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/api";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Largest accepted request body, video uploads included
    pub upload_limit_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
}

/// Admin dashboard credentials and session settings
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 PHC string; admin login is refused while unset
    #[serde(default)]
    pub password_hash: Option<String>,
    /// HS256 signing secret; a random one is generated at startup when unset
    #[serde(default)]
    pub token_secret: Option<String>,
    pub token_ttl_seconds: u64,
    #[serde(default)]
    pub login: RateLimiterConfig,
}

impl AppConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load using `path` (without extension) as the optional config file
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:3001")?
            .set_default("server.upload_limit_bytes", 512_i64 * 1024 * 1024)?
            .set_default("backend.kind", "postgres")?
            .set_default("storage.kind", "s3")?
            .set_default("storage.bucket", "videos")?
            .set_default(
                "storage.public_base_url",
                "http://localhost:54321/storage/v1/object/public/videos",
            )?
            .set_default("admin.username", "admin")?
            .set_default("admin.token_ttl_seconds", 8_i64 * 60 * 60)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            );

        if let Ok(url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}
