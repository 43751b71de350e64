//! Outbound HTTP calls with normalized failures

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for outbound requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("weatherhub/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when calling an upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The provider answered with a non-2xx status
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The provider could not be reached (DNS, refused connection, timeout)
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The provider answered 2xx with a body we could not decode
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

/// Thin wrapper around a shared `reqwest::Client`
///
/// Performs a single GET per call. Nothing is retried.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
}

impl UpstreamClient {
    /// Creates a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self { http })
    }

    /// Creates a client around an existing `reqwest::Client`
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Fetches `url` with `params` as query string and returns the JSON body
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded body of a 2xx response
    /// * `Err(UpstreamError::Status)` - The provider's status code on non-2xx
    /// * `Err(UpstreamError::Transport)` - If the request never completed
    /// * `Err(UpstreamError::Decode)` - If the body is not JSON
    pub async fn fetch<P>(&self, url: &str, params: &P) -> Result<Value, UpstreamError>
    where
        P: Serialize + ?Sized,
    {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned status {}", url, status);
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// Like [`fetch`](Self::fetch), but decodes the body into `T`
    pub async fn fetch_as<T, P>(&self, url: &str, params: &P) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let value = self.fetch(url, params).await?;
        serde_json::from_value(value).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}
