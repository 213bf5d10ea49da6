use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid number, got {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the charge service; charges are posted to `{url}/charge`.
    pub charge_service_url: String,
    /// HTTP client timeout for a single charge call.
    pub charge_timeout: Duration,
    /// Deadline given to every inbound request.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let charge_service_url =
            lookup("CHARGE_SERVICE_URL").ok_or(ConfigError::Missing("CHARGE_SERVICE_URL"))?;
        let charge_timeout = Duration::from_millis(parse_or(&lookup, "CHARGE_TIMEOUT_MS", 5_000)?);
        let request_timeout =
            Duration::from_millis(parse_or(&lookup, "REQUEST_TIMEOUT_MS", 10_000)?);

        Ok(Self {
            host,
            port,
            charge_service_url,
            charge_timeout,
            request_timeout,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
