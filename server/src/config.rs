//! Process configuration.
//!
//! Read once at startup from the environment. A missing required variable
//! is fatal, never a request-time error.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use hello_views_session::constants::DEFAULT_MAX_AGE_SECS;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("you must define the {0} env var")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port (`PORT`, required).
    pub port: u16,
    /// Bind address (`BIND_ADDR`, default `0.0.0.0`).
    pub bind_addr: IpAddr,
    /// Document store instance (`REDIS_URL`, required).
    pub redis_url: String,
    /// Cookie encryption key (`SESSION_KEY`, base64, 32 bytes). `None`
    /// means a per-process random key.
    pub session_key: Option<Vec<u8>>,
    /// Cookie max age and record TTL (`SESSION_MAX_AGE_SECS`).
    pub session_max_age: Duration,
}

impl ServerConfig {
    /// Load from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .ok_or(ConfigError::Missing("PORT"))?
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?;

        let redis_url = var("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;

        let bind_addr = match var("BIND_ADDR") {
            Some(addr) => addr.trim().parse::<IpAddr>().map_err(|e| {
                ConfigError::Invalid {
                    name: "BIND_ADDR",
                    reason: e.to_string(),
                }
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let session_key = var("SESSION_KEY")
            .map(|key| {
                STANDARD.decode(key.trim()).map_err(|e| ConfigError::Invalid {
                    name: "SESSION_KEY",
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        if let Some(key) = &session_key {
            if key.len() != 32 {
                return Err(ConfigError::Invalid {
                    name: "SESSION_KEY",
                    reason: format!("expected 32 bytes, got {}", key.len()),
                });
            }
        }

        let max_age_secs = match var("SESSION_MAX_AGE_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "SESSION_MAX_AGE_SECS",
                    reason: format!("expected a positive number of seconds, got {secs:?}"),
                })?,
            None => DEFAULT_MAX_AGE_SECS,
        };

        Ok(Self {
            port,
            bind_addr,
            redis_url,
            session_key,
            session_max_age: Duration::seconds(max_age_secs),
        })
    }

    /// Socket address to listen on.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_minimal_config() {
        let config = load(&[("PORT", "8080"), ("REDIS_URL", "redis://localhost")]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url, "redis://localhost");
        assert!(config.session_key.is_none());
        assert_eq!(config.session_max_age, Duration::seconds(DEFAULT_MAX_AGE_SECS));
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_port_is_fatal() {
        assert_eq!(
            load(&[("REDIS_URL", "redis://localhost")]),
            Err(ConfigError::Missing("PORT"))
        );
    }

    #[test]
    fn test_empty_store_is_missing() {
        assert_eq!(
            load(&[("PORT", "8080"), ("REDIS_URL", " ")]),
            Err(ConfigError::Missing("REDIS_URL"))
        );
    }

    #[test]
    fn test_bad_port_is_invalid() {
        assert!(matches!(
            load(&[("PORT", "eighty"), ("REDIS_URL", "redis://localhost")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_session_key_must_be_32_bytes() {
        let short = STANDARD.encode([1u8; 16]);
        assert!(matches!(
            load(&[
                ("PORT", "8080"),
                ("REDIS_URL", "redis://localhost"),
                ("SESSION_KEY", &short),
            ]),
            Err(ConfigError::Invalid { name: "SESSION_KEY", .. })
        ));

        let key = STANDARD.encode([1u8; 32]);
        let config = load(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://localhost"),
            ("SESSION_KEY", &key),
        ])
        .unwrap();
        assert_eq!(config.session_key, Some(vec![1u8; 32]));
    }

    #[test]
    fn test_optional_overrides() {
        let config = load(&[
            ("PORT", "3000"),
            ("REDIS_URL", "redis://localhost"),
            ("BIND_ADDR", "127.0.0.1"),
            ("SESSION_MAX_AGE_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.session_max_age, Duration::seconds(60));
    }

    #[test]
    fn test_non_positive_max_age_is_invalid() {
        assert!(matches!(
            load(&[
                ("PORT", "3000"),
                ("REDIS_URL", "redis://localhost"),
                ("SESSION_MAX_AGE_SECS", "0"),
            ]),
            Err(ConfigError::Invalid { name: "SESSION_MAX_AGE_SECS", .. })
        ));
    }
}
