//! Typed service configuration handed to the composition root.

use std::env;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

pub const CONFIG_PATH_ENV: &str = "VPMP_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "vpmp.toml";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Reads `$VPMP_CONFIG` (or `vpmp.toml`) when present and applies
    /// `$DATABASE_URL` on top.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var(DATABASE_URL_ENV) {
            config.database.url = url;
        }
        if config.database.url.trim().is_empty() {
            bail!("database url is not configured: set {DATABASE_URL_ENV} or [database].url");
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize service config")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            run_migrations: default_run_migrations(),
            max_connections: None,
            sqlx_logging: false,
        }
    }
}

/// Origins allowed to call the API. Empty means any origin.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_run_migrations() -> bool {
    true
}
