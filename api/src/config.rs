use std::{num::NonZeroU32, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

const DEFAULT_RATE_LIMIT: NonZeroU32 = NonZeroU32::new(100).unwrap();

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Prefix for cover and avatar URLs, without a trailing slash.
    pub asset_base_url: String,
    pub bcrypt_cost: u32,
    pub rate_limit_per_second: NonZeroU32,
}

impl AppConfig {
    /// Defaults for everything except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".to_string(),
            jwt_secret: jwt_secret.into(),
            asset_base_url: "http://localhost:4000/images".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            rate_limit_per_second: DEFAULT_RATE_LIMIT,
        }
    }

    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let mut config = Self::new(jwt_secret);

        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("ASSET_BASE_URL") {
            config.asset_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(cost) = parsed("BCRYPT_COST")? {
            config.bcrypt_cost = cost;
        }
        if let Some(rate) = parsed("RATE_LIMIT_PER_SECOND")? {
            config.rate_limit_per_second = rate;
        }

        Ok(config)
    }
}

fn parsed<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
