//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - PostgreSQL connection string. When unset the service
//!   runs on the in-memory data service.
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `NATS_URL` - Event bus; events are dropped when unset
//! - `CURRENCY` - ISO code used when formatting totals (default: USD)
//! - `CART_IDLE_MINUTES` - Session carts untouched this long are dropped (default: 1440)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub db_max_connections: u32,
    pub nats_url: Option<String>,
    pub currency: String,
    pub cart_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            host: parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&lookup, "PORT", 8083)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            nats_url: non_empty("NATS_URL"),
            currency: non_empty("CURRENCY").map_or_else(|| "USD".to_string(), |c| c.trim().to_uppercase()),
            cart_idle_timeout: Duration::from_secs(60 * parse_or(&lookup, "CART_IDLE_MINUTES", 1440u64)?.max(1)),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, None);
        assert_eq!(c.socket_addr().to_string(), "0.0.0.0:8083");
        assert_eq!(c.db_max_connections, 10);
        assert_eq!(c.currency, "USD");
        assert_eq!(c.cart_idle_timeout, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_overrides() {
        let c = config(&[("DATABASE_URL", "postgres://localhost/shop"), ("PORT", "9000"), ("HOST", "127.0.0.1"), ("CURRENCY", "ngn"), ("NATS_URL", " ")]).unwrap();
        assert_eq!(c.database_url.as_deref(), Some("postgres://localhost/shop"));
        assert_eq!(c.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(c.currency, "NGN");
        assert_eq!(c.nats_url, None);
        assert_eq!(config(&[("CART_IDLE_MINUTES", "30")]).unwrap().cart_idle_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(config(&[("PORT", "eighty")]), Err(ConfigError::InvalidEnvVar(key, _)) if key == "PORT"));
    }
}
