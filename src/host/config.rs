//! Host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_UPSTREAM: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HostConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("API_UPSTREAM must be an http(s) URL, got {0}")]
    InvalidUpstream(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
    /// Backend origin `/api` requests are forwarded to.
    pub api_upstream: String,
    /// Path prefix that is proxied, kept on the forwarded path.
    pub api_prefix: String,
    pub proxy_timeout_secs: u64,
}

impl HostConfig {
    /// Build typed host config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `API_UPSTREAM`: default `http://localhost:8000`
    /// - `API_PROXY_PREFIX`: default `/api`
    /// - `API_PROXY_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns [`HostConfigError`] for an unparsable port or a non-HTTP
    /// upstream.
    pub fn from_env() -> Result<Self, HostConfigError> {
        let var = |key: &str| std::env::var(key).ok();
        Self::from_values(
            var("PORT").as_deref(),
            var("API_UPSTREAM").as_deref(),
            var("API_PROXY_PREFIX").as_deref(),
            var("API_PROXY_TIMEOUT_SECS").as_deref(),
        )
    }

    fn from_values(
        port: Option<&str>,
        upstream: Option<&str>,
        prefix: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, HostConfigError> {
        let port = match port.map(str::trim) {
            Some(raw) => raw.parse::<u16>().map_err(|_| HostConfigError::InvalidPort(raw.to_owned()))?,
            None => DEFAULT_PORT,
        };
        let api_upstream = upstream
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_UPSTREAM)
            .trim_end_matches('/')
            .to_owned();
        if !(api_upstream.starts_with("http://") || api_upstream.starts_with("https://")) {
            return Err(HostConfigError::InvalidUpstream(api_upstream));
        }
        let api_prefix = match prefix.map(|p| p.trim().trim_end_matches('/')) {
            Some(p) if !p.is_empty() => format!("/{}", p.trim_start_matches('/')),
            _ => DEFAULT_API_PREFIX.to_owned(),
        };
        let proxy_timeout_secs = timeout_secs
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_PROXY_TIMEOUT_SECS);
        Ok(Self { port, api_upstream, api_prefix, proxy_timeout_secs })
    }
}
