//! Google Maps geocoding client

use serde_json::Value;

use super::http::{UpstreamClient, UpstreamError};

/// Endpoint for the Google Geocoding API
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Client for address lookups against the Google Geocoding API
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: UpstreamClient,
    url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(http: UpstreamClient, api_key: impl Into<String>) -> Self {
        Self::with_url(http, GOOGLE_GEOCODE_URL, api_key)
    }

    /// Creates a geocoder against a custom endpoint (for testing)
    pub fn with_url(
        http: UpstreamClient,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// The key handed out to browser clients that render maps
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Geocodes a free-form address, returning the provider document unchanged
    pub async fn geocode(&self, address: &str) -> Result<Value, UpstreamError> {
        let params = [("address", address), ("key", self.api_key.as_str())];
        self.http.fetch(&self.url, &params).await
    }
}
