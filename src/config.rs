use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub(crate) struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool_size: u32,
    pub static_root: PathBuf,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: load(&lookup, "HOST", "0.0.0.0")?,
            port: load(&lookup, "PORT", "3000")?,
            database_url: load(&lookup, "DATABASE_URL", "nature.db")?,
            pool_size: load(&lookup, "DATABASE_POOL_SIZE", "8")?,
            static_root: load(&lookup, "STATIC_ROOT", "dist")?,
        })
    }
}

fn load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
