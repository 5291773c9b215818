//! # configs
//!
//! Layered settings for the board server.
//!
//! Precedence, lowest first: built-in defaults, `config/default.toml`,
//! `config/local.toml`, `ANONBOARD__*` environment variables, then the bare
//! `PORT` and `DB` variables many hosting platforms inject.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Copies `.env` (searched upwards from the working directory) into the
/// process environment. A missing file is fine; an unreadable one is
/// returned so the caller can log it once tracing is up.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::dotenv().map(drop))
}

fn ignore_missing(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(err) if err.not_found() => Ok(()),
        other => other,
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string of the document store. Absent means in-memory.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetSettings {
    pub public_dir: Option<PathBuf>,
    pub index_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it.
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Settings {
    /// Builds settings from every layer of the process environment. Call
    /// [`load_dotenv`] first so `.env` entries are part of it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(
            "config",
            std::env::var("PORT").ok(),
            std::env::var("DB").ok(),
        )
    }

    /// Builds settings from files under `config_dir`, `ANONBOARD__*`
    /// variables, and the legacy `port`/`db` overrides.
    pub fn from_sources(
        config_dir: &str,
        port: Option<String>,
        db: Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = port
            .map(|raw| {
                raw.parse::<u16>()
                    .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {raw}")))
            })
            .transpose()?;

        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 5)?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
            .add_source(File::with_name(&format!("{config_dir}/local")).required(false))
            .add_source(Environment::with_prefix("ANONBOARD").separator("__"))
            .set_override_option("server.port", port.map(i64::from))?
            .set_override_option("database.url", db.filter(|url| !url.is_empty()))?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "server.host is not an IP address: {}",
                    self.server.host
                ))
            })
    }
}
