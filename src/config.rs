use crate::error::Result;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Location used when nothing overrides it: `test.db` in the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./test.db";

/// Prefix for environment overrides, e.g. `DETECTLOG_DATABASE_URL`.
pub const ENV_PREFIX: &str = "DETECTLOG_";

/// Process configuration. Built once at startup and handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
    pub max_connections: u32,
    pub init_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            loglevel: "info".to_string(),
            max_connections: 5,
            init_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Defaults overlaid with `DETECTLOG_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    pub fn init_timeout(&self) -> Duration {
        Duration::from_secs(self.init_timeout_secs)
    }
}
