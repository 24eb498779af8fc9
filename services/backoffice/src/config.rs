//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional
//! `config/backoffice.{toml,yaml,json}` file, then `BACKOFFICE__*` environment
//! variables (`BACKOFFICE__SERVER__PORT`, `BACKOFFICE__JWT__SECRET`, ...).
//! Database settings are read separately by [`common::DatabaseConfig::from_env`].

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::jwt::{JwtConfig, MIN_SECRET_LENGTH};

const ENV_PREFIX: &str = "BACKOFFICE";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("jwt.secret must be at least {} bytes long", MIN_SECRET_LENGTH)]
    WeakSecret,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Administrator created at startup when both fields are set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("jwt.access_token_expiry", 900)?
            .set_default("jwt.refresh_token_expiry", 604_800)?
            .add_source(File::with_name("config/backoffice").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if config.jwt.secret.len() < MIN_SECRET_LENGTH {
            return Err(AppConfigError::WeakSecret);
        }

        Ok(config)
    }
}
