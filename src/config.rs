//! Dashboard configuration.
//!
//! Values come from `CAMDASH_WS_URL`, `CAMDASH_API_BASE_URL` and
//! `CAMDASH_OPEN_TIMEOUT_SECS` (or matching CLI flags); anything unset falls
//! back to the defaults below.

use std::time::Duration;

use crate::channel::{self, ChannelError};

pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws/camera";
pub const DEFAULT_API_BASE_URL: &str = "http://host.docker.internal:8080";
pub const DEFAULT_OPEN_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CAMDASH_WS_URL: {0}")]
    WsUrl(#[source] ChannelError),
    #[error("CAMDASH_API_BASE_URL: invalid base URL `{url}`: {reason}")]
    ApiBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Camera channel endpoint.
    pub ws_url: String,
    /// REST backend base, without a trailing slash.
    pub api_base_url: String,
    /// How long commands wait for the channel to open.
    pub open_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            open_timeout: Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Build config from raw values; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when either URL is malformed.
    pub fn from_values(
        ws_url: Option<&str>,
        api_base_url: Option<&str>,
        open_timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            ws_url: parse_ws_url(ws_url)?,
            api_base_url: parse_api_base_url(api_base_url)?,
            open_timeout: parse_timeout(open_timeout_secs),
        })
    }
}

fn parse_ws_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let url = raw.map_or(DEFAULT_WS_URL, str::trim);
    channel::validate_endpoint(url).map_err(ConfigError::WsUrl)?;
    Ok(url.to_owned())
}

fn parse_api_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let url = raw.map_or(DEFAULT_API_BASE_URL, str::trim).trim_end_matches('/');
    let invalid = |reason: String| ConfigError::ApiBaseUrl { url: url.to_owned(), reason };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".to_owned()));
    }
    Ok(url.to_owned())
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_OPEN_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
