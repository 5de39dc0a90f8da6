use clap::{Parser, ValueEnum};
use linkhop_generator::{CodeLength, InvalidCodeLength};
use linkhop_ratelimit::RateLimitPolicy;
use linkhop_shortener::{InvalidTtlDays, ShortenerSettings, TtlDays};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::{NonZeroU32, NonZeroU64, NonZeroUsize};
use thiserror::Error;

pub const LISTEN_ADDR_ENV: &str = "LINKHOP_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "LINKHOP_BASE_URL";
pub const CODE_LENGTH_ENV: &str = "LINKHOP_CODE_LENGTH";
pub const TTL_DAYS_ENV: &str = "LINKHOP_DEFAULT_TTL_DAYS";
pub const CACHE_MAX_ENTRIES_ENV: &str = "LINKHOP_CACHE_MAX_ENTRIES";
pub const CACHE_SWEEP_SECS_ENV: &str = "LINKHOP_CACHE_SWEEP_SECS";
pub const RATE_MAX_BUCKETS_ENV: &str = "LINKHOP_RATE_MAX_BUCKETS";
pub const RATE_LIMIT_ENV: &str = "LINKHOP_RATE_LIMIT";
pub const RATE_WINDOW_MS_ENV: &str = "LINKHOP_RATE_WINDOW_MS";
pub const ENVIRONMENT_ENV: &str = "LINKHOP_ENV";
pub const STORAGE_BACKEND_ENV: &str = "LINKHOP_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "LINKHOP_DATABASE_URL";
pub const DB_MAX_CONNECTIONS_ENV: &str = "LINKHOP_DB_MAX_CONNECTIONS";
pub const LOG_FORMAT_ENV: &str = "LINKHOP_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[value(name = "development")]
    Development,
    #[default]
    #[value(name = "production")]
    Production,
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    CodeLength(#[from] InvalidCodeLength),
    #[error(transparent)]
    TtlDays(#[from] InvalidTtlDays),
    #[error("a database url is required when the storage backend is postgres")]
    MissingDatabaseUrl,
}

#[derive(Debug, Parser)]
#[command(name = "linkhop-gateway")]
pub struct Config {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of the short URLs handed back to clients.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = 7,
        value_parser = clap::value_parser!(u8).range(4..=12),
    )]
    pub code_length: u8,

    #[arg(
        long,
        env = TTL_DAYS_ENV,
        default_value_t = 30,
        value_parser = clap::value_parser!(u16).range(1..=3650),
    )]
    pub default_ttl_days: u16,

    #[arg(long, env = CACHE_MAX_ENTRIES_ENV, default_value = "50000")]
    pub cache_max_entries: NonZeroUsize,

    /// Seconds between background purges of expired cache entries. 0 disables the sweep.
    #[arg(long, env = CACHE_SWEEP_SECS_ENV, default_value_t = 0)]
    pub cache_sweep_secs: u64,

    #[arg(long, env = RATE_MAX_BUCKETS_ENV, default_value = "50000")]
    pub rate_max_buckets: NonZeroUsize,

    /// Link creations allowed per client per window.
    #[arg(long, env = RATE_LIMIT_ENV, default_value = "10")]
    pub rate_limit: NonZeroU32,

    #[arg(long, env = RATE_WINDOW_MS_ENV, default_value = "60000")]
    pub rate_window_ms: NonZeroU64,

    #[arg(
        long,
        env = ENVIRONMENT_ENV,
        value_enum,
        default_value_t = Environment::Production
    )]
    pub environment: Environment,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_URL_ENV, required_if_eq("storage", "postgres"))]
    pub database_url: Option<String>,

    #[arg(long, env = DB_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub db_max_connections: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn shortener_settings(&self) -> Result<ShortenerSettings, ConfigError> {
        Ok(ShortenerSettings::builder()
            .code_length(CodeLength::new(usize::from(self.code_length))?)
            .ttl_days(TtlDays::new(u32::from(self.default_ttl_days))?)
            .build())
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.rate_limit, self.rate_window_ms)
    }

    /// Checks every setting that clap alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shortener_settings()?;
        if self.storage == StorageBackendArg::Postgres && self.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }
}
