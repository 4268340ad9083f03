use super::*;

#[test]
fn defaults_when_unset() {
    let config = HostConfig::from_values(None, None, None, None).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.api_upstream, DEFAULT_API_UPSTREAM);
    assert_eq!(config.api_prefix, "/api");
    assert_eq!(config.proxy_timeout_secs, DEFAULT_PROXY_TIMEOUT_SECS);
}

#[test]
fn trims_upstream_and_normalizes_prefix() {
    let config =
        HostConfig::from_values(Some("8080"), Some("https://api.example.com/"), Some("backend/"), Some("5")).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.api_upstream, "https://api.example.com");
    assert_eq!(config.api_prefix, "/backend");
    assert_eq!(config.proxy_timeout_secs, 5);
}

#[test]
fn rejects_bad_port() {
    assert_eq!(
        HostConfig::from_values(Some("eighty"), None, None, None),
        Err(HostConfigError::InvalidPort("eighty".to_owned()))
    );
}

#[test]
fn rejects_non_http_upstream() {
    assert!(matches!(
        HostConfig::from_values(None, Some("localhost:8000"), None, None),
        Err(HostConfigError::InvalidUpstream(_))
    ));
}

#[test]
fn zero_timeout_falls_back_to_default() {
    let config = HostConfig::from_values(None, None, None, Some("0")).unwrap();
    assert_eq!(config.proxy_timeout_secs, DEFAULT_PROXY_TIMEOUT_SECS);
}
