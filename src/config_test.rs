use super::*;

#[test]
fn defaults_when_unset() {
    let config = DashboardConfig::from_values(None, None, None).unwrap();
    assert_eq!(config, DashboardConfig::default());
    assert_eq!(config.ws_url, "ws://localhost:8080/ws/camera");
    assert_eq!(config.api_base_url, "http://host.docker.internal:8080");
    assert_eq!(config.open_timeout, Duration::from_secs(5));
}

#[test]
fn explicit_values_are_used() {
    let config =
        DashboardConfig::from_values(Some("wss://cam.example/ws/camera"), Some("https://api.example/"), Some("12"))
            .unwrap();
    assert_eq!(config.ws_url, "wss://cam.example/ws/camera");
    assert_eq!(config.api_base_url, "https://api.example");
    assert_eq!(config.open_timeout, Duration::from_secs(12));
}

#[test]
fn ws_url_must_be_websocket() {
    let err = parse_ws_url(Some("http://localhost:8080/ws/camera")).unwrap_err();
    assert!(matches!(err, ConfigError::WsUrl(ChannelError::InvalidEndpoint { .. })));
    assert!(err.to_string().starts_with("CAMDASH_WS_URL"));
}

#[test]
fn api_base_url_must_be_http() {
    assert!(matches!(parse_api_base_url(Some("ws://backend")), Err(ConfigError::ApiBaseUrl { .. })));
    assert!(matches!(parse_api_base_url(Some("not a url")), Err(ConfigError::ApiBaseUrl { .. })));
}

#[test]
fn bad_timeout_falls_back_to_default() {
    assert_eq!(parse_timeout(Some("soon")), Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS));
    assert_eq!(parse_timeout(Some("0")), Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS));
    assert_eq!(parse_timeout(Some(" 3 ")), Duration::from_secs(3));
}
