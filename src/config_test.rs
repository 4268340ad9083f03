use super::*;

#[test]
fn defaults_match_backend_layout() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base_url, "/api/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.token_storage_key, "accessToken");
}

#[test]
fn from_values_overrides_base_url_and_strips_trailing_slash() {
    let config = ClientConfig::from_values(Some("https://api.example.com/v2/"), None);
    assert_eq!(config.api_base_url, "https://api.example.com/v2");
}

#[test]
fn from_values_ignores_blank_base_url() {
    let config = ClientConfig::from_values(Some("   "), None);
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_values_parses_timeout() {
    let config = ClientConfig::from_values(None, Some("2500"));
    assert_eq!(config.request_timeout, Duration::from_millis(2500));
}

#[test]
fn from_values_rejects_zero_or_garbage_timeout() {
    assert_eq!(
        ClientConfig::from_values(None, Some("0")).request_timeout,
        Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
    );
    assert_eq!(
        ClientConfig::from_values(None, Some("soon")).request_timeout,
        Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
    );
}

#[test]
fn endpoint_joins_without_double_slashes() {
    let config = ClientConfig::default();
    assert_eq!(config.endpoint("/auth/login"), "/api/v1/auth/login");
    assert_eq!(config.endpoint("todos/"), "/api/v1/todos/");
}

#[test]
fn endpoint_passes_absolute_urls_through() {
    let config = ClientConfig::default();
    assert_eq!(config.endpoint("https://other.example.com/x"), "https://other.example.com/x");
}
