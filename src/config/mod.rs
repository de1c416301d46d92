//! Configuration management for medvault
//!
//! All settings come from the process environment. Each field has a named
//! default in [`defaults`] that applies when the variable is unset.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record store connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Startup dataset loading
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Base URL used by the lookup client
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Record store connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MySQL host; `None` selects the embedded SQLite backend
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    /// Database name, or the SQLite file path
    #[serde(default = "default_db_name")]
    pub name: String,

    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Bulk loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Path to the JSON dataset
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Whether `serve` runs the loader after connecting
    #[serde(default = "default_load_on_start")]
    pub load_on_start: bool,
}

/// Which store backend a [`DatabaseConfig`] selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            max_connections: default_db_max_connections(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            load_on_start: default_load_on_start(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            loader: LoaderConfig::default(),
            api_url: default_api_url(),
        }
    }
}

impl DatabaseConfig {
    pub fn backend(&self) -> Backend {
        match self.host.as_deref() {
            Some(host) if !host.trim().is_empty() => Backend::MySql,
            _ => Backend::Sqlite,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Config::default();

        config.database.host = var("DB_HOST");
        if let Some(port) = parse_var::<u16, _>(&var, "DB_PORT")? {
            config.database.port = port;
        }
        if let Some(user) = var("DB_USER") {
            config.database.user = user;
        }
        // An empty password is meaningful, so read it unfiltered.
        if let Some(password) = lookup("DB_PASSWORD") {
            config.database.password = password;
        }
        if let Some(name) = var("DB_NAME") {
            config.database.name = name;
        }

        if let Some(port) = parse_var::<u16, _>(&var, "PORT")? {
            config.server.port = port;
        }
        if let Some(addr) = var("BIND_ADDR") {
            config.server.bind_addr = addr;
        }

        if let Some(path) = var("MEDVAULT_DATA") {
            config.loader.data_path = PathBuf::from(path);
        }
        if let Some(flag) = var("MEDVAULT_LOAD_ON_START") {
            config.loader.load_on_start = parse_bool("MEDVAULT_LOAD_ON_START", &flag)?;
        }

        if let Some(url) = var("MEDVAULT_API_URL") {
            config.api_url = url;
        }

        config.validate()?;
        debug!(backend = ?config.database.backend(), "Configuration loaded");
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("PORT must be non-zero".to_string()));
        }

        if self.database.name.trim().is_empty() {
            return Err(Error::Config("DB_NAME must not be empty".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database.max_connections must be positive".to_string(),
            ));
        }

        Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", self.api_url, e)))?;

        Ok(())
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Invalid {}='{}': {}", key, raw, e)))
        })
        .transpose()
}

pub fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "Invalid {}='{}': expected true or false",
            key, other
        ))),
    }
}
