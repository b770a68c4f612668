//! API endpoint and client settings.
//!
//! Values are read from environment variables and fall back to the
//! defaults below, which match a backend running locally.

use std::time::Duration;

/// Default values.
pub mod defaults {
    pub const API_PROTOCOL: &str = "http";
    pub const API_HOST: &str = "127.0.0.1";
    pub const API_PORT: &str = "8080";
    /// Per-request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: u64 = 10;
}

/// Environment variable names.
pub mod env_vars {
    pub const API_PROTOCOL: &str = "DEVCONF_API_PROTOCOL";
    pub const API_HOST: &str = "DEVCONF_API_HOST";
    pub const API_PORT: &str = "DEVCONF_API_PORT";
    /// Full base URL; takes precedence over protocol/host/port
    pub const API_BASE: &str = "DEVCONF_API_BASE";
    pub const HTTP_TIMEOUT_SECS: &str = "DEVCONF_HTTP_TIMEOUT_SECS";
    /// `true` switches log output to JSON
    pub const LOG_JSON: &str = "DEVCONF_LOG_JSON";
}

/// Connection settings for the configuration backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: Duration::from_secs(defaults::HTTP_TIMEOUT_SECS),
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(env_vars::API_BASE).unwrap_or_else(|| {
            let protocol =
                non_empty(env_vars::API_PROTOCOL).unwrap_or_else(|| defaults::API_PROTOCOL.into());
            let host = non_empty(env_vars::API_HOST).unwrap_or_else(|| defaults::API_HOST.into());
            // an explicitly empty port means "no port in the URL"
            let port = lookup(env_vars::API_PORT)
                .map(|p| p.trim().to_string())
                .unwrap_or_else(|| defaults::API_PORT.to_string());
            if port.is_empty() {
                format!("{}://{}", protocol, host)
            } else {
                format!("{}://{}:{}", protocol, host, port)
            }
        });

        let timeout_secs = lookup(env_vars::HTTP_TIMEOUT_SECS)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults::HTTP_TIMEOUT_SECS);

        Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Whether JSON log output was requested.
pub fn log_json() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Remove trailing slashes.
pub fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parts_from_env() {
        let config = ApiConfig::from_lookup(lookup(&[
            (env_vars::API_PROTOCOL, "https"),
            (env_vars::API_HOST, "gateway.local"),
            (env_vars::API_PORT, "9443"),
            (env_vars::HTTP_TIMEOUT_SECS, "3"),
        ]));
        assert_eq!(config.base_url(), "https://gateway.local:9443");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_empty_port_omitted() {
        let config = ApiConfig::from_lookup(lookup(&[(env_vars::API_PORT, "")]));
        assert_eq!(config.base_url(), "http://127.0.0.1");
    }

    #[test]
    fn test_explicit_base_wins() {
        let config = ApiConfig::from_lookup(lookup(&[
            (env_vars::API_BASE, "http://edge:8080/api/"),
            (env_vars::API_HOST, "ignored"),
        ]));
        assert_eq!(config.base_url(), "http://edge:8080/api");
    }

    #[test]
    fn test_with_timeout_overrides() {
        let config = ApiConfig::new("http://edge/").with_timeout(Duration::from_secs(30));
        assert_eq!(config.base_url(), "http://edge");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[(env_vars::HTTP_TIMEOUT_SECS, "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(defaults::HTTP_TIMEOUT_SECS));
    }
}
