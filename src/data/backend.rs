//! Client for the sibling coordinates service
//!
//! The forecast service does not geocode on its own; it asks the coordinates
//! service over loopback so both share that service's cache.

use super::http::{UpstreamClient, UpstreamError};
use super::Coordinates;

/// Path of the coordinates endpoint on the sibling service
pub const COORDINATES_ENDPOINT: &str = "/coordinates";

/// Calls `GET <url>?city=<name>` and reads back the matching coordinate rows
#[derive(Debug, Clone)]
pub struct CoordinateServiceClient {
    http: UpstreamClient,
    url: String,
}

impl CoordinateServiceClient {
    /// Creates a client for the full endpoint URL (e.g. `http://127.0.0.1:5004/coordinates`)
    pub fn new(http: UpstreamClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolves a city name to its candidate coordinates, best match first
    ///
    /// An unknown city yields an empty list rather than an error.
    pub async fn resolve(&self, city: &str) -> Result<Vec<Coordinates>, UpstreamError> {
        self.http.fetch_as(&self.url, &[("city", city)]).await
    }
}
