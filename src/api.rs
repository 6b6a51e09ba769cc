//! REST client for the camera backend, routed through the rewrite table.

use serde_json::Value;

use crate::rewrites;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no backend route for `{0}`")]
    UnknownRoute(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a dashboard path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// [`ApiError::UnknownRoute`] when `path` has no rewrite, otherwise
    /// transport, status, or decode failures.
    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = rewrites::resolve(path, &self.base_url).ok_or_else(|| ApiError::UnknownRoute(path.to_owned()))?;
        tracing::debug!(%path, %url, "api get");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status: status.as_u16() });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Check the backend health route.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or a non-success status.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = format!("{}/health", self.base_url);
        let status = self.http.get(&url).send().await?.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status: status.as_u16() });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
