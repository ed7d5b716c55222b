//! Configuration management for RAX Auth Server
//!
//! Values are layered: built-in defaults, then `config.toml`, then environment
//! variables prefixed with `RAX_AUTH` (sections separated by `__`).

use config::{Config, Environment, File};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Locations tried, in order, when no explicit config file is given.
const CONFIG_SEARCH_PATHS: [&str; 2] = [
    "rax-auth-server/config", // Docker production: /app/rax-auth-server/config.toml
    "config",                 // Local development: ./config.toml
];

/// Argon2 bounds enforced by the `argon2` crate.
const MIN_MEMORY_KIB: u32 = 8;
const MAX_PARALLELISM: u32 = 0x00ff_ffff;

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: HttpConfig,
    pub store: StoreConfig,
    pub hashing: HashingConfig,
    pub limits: InputLimits,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,
    pub port: u16,
    /// Upper bound on a whole request, including hashing
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

/// Account store settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// SQLite database file holding the `accounts` table
    pub database_path: String,
    /// Pool size
    pub max_connections: u32,
    /// Bound on waiting for a pooled connection
    pub acquire_timeout_ms: u64,
    /// Bound on acquire + query as seen by the verifier
    pub query_timeout_ms: u64,
    /// SQLite lock wait per statement
    pub busy_timeout_ms: u64,
}

/// Argon2id work factor used for new credentials and the dummy credential
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Request field limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputLimits {
    pub max_identifier_length: usize,
    pub max_secret_length: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            max_body_bytes: 65_536,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: "data/accounts.db".to_string(),
            max_connections: 8,
            acquire_timeout_ms: 2_000,
            query_timeout_ms: 2_000,
            busy_timeout_ms: 1_000,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        // OWASP minimum for Argon2id
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_identifier_length: 64,
            max_secret_length: 1_024,
        }
    }
}

impl AppConfig {
    /// Load configuration, optionally from an explicit file.
    ///
    /// Without `path`, the first existing file from the search list is used;
    /// running with no file at all is allowed and falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Config::try_from(&AppConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(found) = find_config_file() {
                    info!("Loading configuration from {}.toml", found);
                    builder = builder.add_source(File::with_name(found));
                } else {
                    info!("No config.toml found, using defaults");
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_AUTH").separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.port == 0 {
            return Err(config::ConfigError::Message("server.port cannot be 0".into()));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "server.request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.database_path.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "store.database_path cannot be empty".into(),
            ));
        }

        if self.store.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "store.max_connections must be greater than 0".into(),
            ));
        }

        if self.store.acquire_timeout_ms == 0 || self.store.query_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "store timeouts must be greater than 0".into(),
            ));
        }

        let hashing = &self.hashing;
        if hashing.iterations == 0 {
            return Err(config::ConfigError::Message(
                "hashing.iterations must be greater than 0".into(),
            ));
        }

        if hashing.parallelism == 0 || hashing.parallelism > MAX_PARALLELISM {
            return Err(config::ConfigError::Message(
                "hashing.parallelism out of range".into(),
            ));
        }

        if hashing.memory_kib < MIN_MEMORY_KIB.max(8 * hashing.parallelism) {
            return Err(config::ConfigError::Message(
                "hashing.memory_kib must be at least 8 KiB per lane".into(),
            ));
        }

        if self.limits.max_identifier_length == 0 || self.limits.max_secret_length == 0 {
            return Err(config::ConfigError::Message(
                "input limits must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn find_config_file() -> Option<&'static str> {
    CONFIG_SEARCH_PATHS
        .into_iter()
        .find(|candidate| Path::new(&format!("{candidate}.toml")).is_file())
}

impl HttpConfig {
    /// Bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Deadline for one whole login, in milliseconds
    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_secs.saturating_mul(1_000)
    }
}

impl StoreConfig {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
