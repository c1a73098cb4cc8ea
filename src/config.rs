//! Config module contains the top-level config for the app.
use std::env;

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

/// Service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server settings
    pub server: Server,
    /// Token settings
    pub jwt: Jwt,
    /// Object storage for listing photos
    pub s3: S3,
    pub cors: Cors,
    pub pagination: Pagination,
    pub log: Log,
    pub sentry: Option<Sentry>,
}

/// Common server settings
#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: String,
    pub database: String,
    pub thread_count: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Jwt {
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3 {
    pub key: String,
    pub secret: String,
    pub region: String,
    pub bucket: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Pagination {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Sentry {
    pub dsn: String,
}

impl Config {
    /// Creates config from base.toml, which are overwritten by <env>.toml, where env is one of development,
    /// test, production. After that it could be overwritten by env variables like LISTINGS_SERVER__PORT
    /// (this will override `server.port` field in config).
    pub fn new() -> Result<Self, ConfigError> {
        let env = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Config::with_env(env)
    }

    pub fn with_env(env: impl Into<String>) -> Result<Self, ConfigError> {
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;
        // Optional file specific for environment
        s.merge(File::with_name(&format!("config/{}", env.into())).required(false))?;
        s.merge(Environment::with_prefix("LISTINGS").separator("__"))?;
        s.try_into()
    }

    /// Normalizes a requested page size against the configured bounds
    pub fn page_limit(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(limit) if limit > 0 => limit.min(self.pagination.max_limit),
            _ => self.pagination.default_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_config_is_loadable() {
        let config = Config::with_env("test").unwrap();
        assert_eq!(config.pagination.default_limit, 5);
        assert!(config.sentry.is_none());
    }

    #[test]
    fn page_limit_respects_bounds() {
        let config = Config::with_env("test").unwrap();
        assert_eq!(config.page_limit(None), 5);
        assert_eq!(config.page_limit(Some(0)), 5);
        assert_eq!(config.page_limit(Some(20)), 20);
        assert_eq!(config.page_limit(Some(100_000)), config.pagination.max_limit);
    }
}
