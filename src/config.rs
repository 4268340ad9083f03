//! Client configuration for the REST API and session persistence.
//!
//! The WASM bundle has no process environment, so overrides are baked in at
//! compile time through `option_env!` and fall back to the defaults below.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "accessToken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined in front of every request path.
    pub api_base_url: String,
    /// Upper bound for a single request before it is classified as a timeout.
    pub request_timeout: Duration,
    /// `localStorage` key holding the raw session token.
    pub token_storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Build config from compile-time variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: default `/api/v1`
    /// - `API_REQUEST_TIMEOUT_MS`: default 15000
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("API_BASE_URL"), option_env!("API_REQUEST_TIMEOUT_MS"))
    }

    fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = base_url.map(str::trim).filter(|s| !s.is_empty()) {
            config.api_base_url = base.trim_end_matches('/').to_owned();
        }
        match timeout_ms.map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(ms)) if ms > 0 => config.request_timeout = Duration::from_millis(ms),
            Some(_) => log::warn!("ignoring invalid API_REQUEST_TIMEOUT_MS; using default"),
            None => {}
        }
        config
    }

    /// Join the configured base URL and an endpoint path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
