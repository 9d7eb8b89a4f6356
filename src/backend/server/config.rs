/**
 * Server Configuration
 *
 * This module builds the `ServerConfig` once at startup and opens the SQLite
 * connection pool. Components receive the config by reference in their
 * constructors; nothing reads the environment after startup.
 *
 * # Configuration Sources
 *
 * 1. An optional TOML file named by `VAULT_CONFIG`
 * 2. Environment variables (a `.env` file is loaded by the binary)
 *
 * Environment variables override the file. `JWT_SIGNING_KEY` is required;
 * every other setting has a default.
 *
 * | Variable          | Field             | Default              |
 * |-------------------|-------------------|----------------------|
 * | `RUN_ADDRESS`     | `bind_addr`       | `0.0.0.0:8080`       |
 * | `DATABASE_URI`    | `database_url`    | `sqlite://vault.db`  |
 * | `LOG_LEVEL`       | `log_level`       | `info`               |
 * | `JWT_SIGNING_KEY` | `jwt_signing_key` | required             |
 * | `TOKEN_TTL_SECS`  | `token_ttl_secs`  | 30 days, `0` = never, at most 100 years |
 * | `BCRYPT_COST`     | `bcrypt_cost`     | `bcrypt::DEFAULT_COST` |
 */

use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://vault.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const MAX_TOKEN_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub log_level: String,
    pub jwt_signing_key: String,
    /// `None` issues tokens without an expiry
    pub token_ttl: Option<Duration>,
    pub bcrypt_cost: u32,
}

/// Settings as they appear in the TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub jwt_signing_key: Option<String>,
    pub token_ttl_secs: Option<u64>,
    pub bcrypt_cost: Option<u32>,
}

impl FileConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load from `VAULT_CONFIG` (if set) and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var("VAULT_CONFIG") {
            Ok(path) => FileConfig::load(path)?,
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merge file settings with values from `lookup`; `lookup` wins
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ServerConfig::builder();

        if let Some(addr) = lookup("RUN_ADDRESS").or(file.bind_addr) {
            builder = builder.bind_addr(parse_value("RUN_ADDRESS", &addr)?);
        }
        if let Some(url) = lookup("DATABASE_URI").or(file.database_url) {
            builder = builder.database_url(url);
        }
        if let Some(level) = lookup("LOG_LEVEL").or(file.log_level) {
            builder = builder.log_level(level);
        }
        if let Some(key) = lookup("JWT_SIGNING_KEY").or(file.jwt_signing_key) {
            builder = builder.jwt_signing_key(key);
        }
        let ttl = match lookup("TOKEN_TTL_SECS") {
            Some(raw) => Some(parse_value::<u64>("TOKEN_TTL_SECS", &raw)?),
            None => file.token_ttl_secs,
        };
        if let Some(secs) = ttl {
            builder = builder.token_ttl_secs(secs);
        }
        let cost = match lookup("BCRYPT_COST") {
            Some(raw) => Some(parse_value::<u32>("BCRYPT_COST", &raw)?),
            None => file.bcrypt_cost,
        };
        if let Some(cost) = cost {
            builder = builder.bcrypt_cost(cost);
        }

        builder.build()
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        message: e.to_string(),
    })
}

#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_addr: Option<SocketAddr>,
    database_url: Option<String>,
    log_level: Option<String>,
    jwt_signing_key: Option<String>,
    token_ttl_secs: Option<u64>,
    bcrypt_cost: Option<u32>,
}

impl ServerConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn jwt_signing_key(mut self, key: impl Into<String>) -> Self {
        self.jwt_signing_key = Some(key.into());
        self
    }

    /// `0` disables token expiry
    pub fn token_ttl_secs(mut self, secs: u64) -> Self {
        self.token_ttl_secs = Some(secs);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let jwt_signing_key = self
            .jwt_signing_key
            .ok_or(ConfigError::MissingValue("JWT_SIGNING_KEY"))?;
        if jwt_signing_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SIGNING_KEY",
                message: "signing key cannot be empty".to_string(),
            });
        }

        let bcrypt_cost = self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                message: format!("cost {} is outside 4..=31", bcrypt_cost),
            });
        }

        let bind_addr = match self.bind_addr {
            Some(addr) => addr,
            None => parse_value("RUN_ADDRESS", DEFAULT_BIND_ADDR)?,
        };

        let token_ttl = match self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS) {
            0 => None,
            secs if secs > MAX_TOKEN_TTL_SECS => {
                return Err(ConfigError::InvalidValue {
                    name: "TOKEN_TTL_SECS",
                    message: format!("{} exceeds the maximum of {}", secs, MAX_TOKEN_TTL_SECS),
                });
            }
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(ServerConfig {
            bind_addr,
            database_url: self
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            log_level: self.log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            jwt_signing_key,
            token_ttl,
            bcrypt_cost,
        })
    }
}

/// Open the SQLite pool named by the config and run migrations
pub async fn load_database(config: &ServerConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let in_memory = config.database_url.contains(":memory:");
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    let options = if in_memory {
        options
    } else {
        options.journal_mode(SqliteJournalMode::Wal)
    };

    let pool_options = if in_memory {
        // Every connection to `:memory:` opens a separate database
        single_connection_pool()
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };
    let pool = pool_options.connect_with(options).await?;

    tracing::info!("Database connection pool created successfully");

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Fresh, migrated in-memory database
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = single_connection_pool().connect_with(options).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn single_connection_pool() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}
