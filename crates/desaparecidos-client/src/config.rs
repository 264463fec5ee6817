//! Client configuration: the registry base URL and the request timeout.

use std::time::Duration;

use thiserror::Error;

pub const BASE_URL_VAR: &str = "DESAPARECIDOS_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "DESAPARECIDOS_API_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Immutable client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// No trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Read [`BASE_URL_VAR`] and [`TIMEOUT_VAR`], falling back to defaults
    /// when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_ms = match lookup(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => parse_timeout_ms(&raw)?,
        };

        Ok(Self::new(base_url, Duration::from_millis(timeout_ms)))
    }

    pub fn timeout_ms(&self) -> u128 {
        self.timeout.as_millis()
    }
}

fn parse_timeout_ms(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(ConfigError::InvalidTimeout {
            var: TIMEOUT_VAR,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout_ms(), 10_000);
    }

    #[test]
    fn reads_both_variables() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://abitus-api.geia.vip/"),
            (TIMEOUT_VAR, "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://abitus-api.geia.vip");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn blank_base_url_uses_default() {
        let config = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn non_numeric_timeout_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "dez")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidTimeout {
                var: TIMEOUT_VAR,
                value: "dez".into()
            }
        );
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(ClientConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "0")])).is_err());
    }

    #[test]
    fn trailing_slashes_trimmed() {
        let config = ClientConfig::new("http://localhost:4000//", Duration::from_secs(1));
        assert_eq!(config.base_url, "http://localhost:4000");
    }
}
