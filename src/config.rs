//! Configuration loading with layered overrides.
//!
//! Config is loaded in order (each layer overrides the previous):
//! 1. Default values
//! 2. Config file (TOML)
//! 3. Environment variables
//! 4. CLI arguments

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Configuration shared between requests.
pub type SharedConfig = Arc<Config>;

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub database: Database,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Apply the schema script before accepting connections.
    #[serde(default)]
    pub init_on_start: bool,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            init_on_start: false,
        }
    }
}

fn default_database_url() -> String {
    "database.db".to_string()
}

/// Overrides taken from the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub database_url: Option<&'a str>,
    pub init_db: bool,
}

/// Builder for loading configuration with customizable options.
#[derive(Debug, Clone)]
pub struct Loader {
    /// Environment variable prefix (e.g., "CADASTRO" -> CADASTRO_HOST, CADASTRO_PORT)
    pub env_prefix: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            env_prefix: "CADASTRO".to_string(),
        }
    }
}

impl Loader {
    /// Create a new config loader with the given environment prefix.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Load configuration from file, environment, and CLI arguments.
    pub fn load(&self, config_path: Option<&Path>, cli: &Overrides<'_>) -> crate::Result<Config> {
        // Start with file config or defaults
        let mut config: Config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
        } else {
            Config::default()
        };

        // Override with environment variables
        let prefix = &self.env_prefix;

        if let Ok(host) = std::env::var(format!("{prefix}_HOST")) {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var(format!("{prefix}_PORT"))
            && let Ok(p) = port.parse()
        {
            config.server.port = p;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(flag) = std::env::var(format!("{prefix}_INIT_DB")) {
            config.database.init_on_start = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        // Override with CLI arguments
        if let Some(host) = cli.host {
            config.server.host = host.to_string();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(url) = cli.database_url {
            config.database.url = url.to_string();
        }
        if cli.init_db {
            config.database.init_on_start = true;
        }

        if config.database.url.trim().is_empty() {
            return Err(Error::Config("database url must not be empty".into()));
        }

        Ok(config)
    }
}
