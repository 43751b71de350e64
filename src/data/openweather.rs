//! OpenWeatherMap API client
//!
//! Covers the four endpoints the services proxy: reverse and direct
//! geocoding, current weather and the One Call daily forecast.

use serde_json::Value;

use super::http::{UpstreamClient, UpstreamError};
use super::GeocodeMatch;

/// Base URL for the OpenWeatherMap API
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const REVERSE_GEOCODE_PATH: &str = "/geo/1.0/reverse";
const DIRECT_GEOCODE_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const ONE_CALL_PATH: &str = "/data/3.0/onecall";

/// One Call blocks left out of forecast requests; only daily data is kept
const FORECAST_EXCLUDE: &str = "minutely,hourly,alerts,current";

/// Client for the OpenWeatherMap geocoding and weather endpoints
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: UpstreamClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Creates a client against the public API
    pub fn new(http: UpstreamClient, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, OPENWEATHER_BASE_URL, api_key)
    }

    /// Creates a client against a custom base URL (for testing)
    pub fn with_base_url(
        http: UpstreamClient,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Looks up the place name closest to the given coordinates
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Value, UpstreamError> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key.clone()),
        ];
        self.http.fetch(&self.url(REVERSE_GEOCODE_PATH), &params).await
    }

    /// Looks up coordinates for a city name, as the raw provider array
    pub async fn direct_geocode(&self, city: &str) -> Result<Value, UpstreamError> {
        let params = [("q", city), ("appid", self.api_key.as_str())];
        self.http.fetch(&self.url(DIRECT_GEOCODE_PATH), &params).await
    }

    /// Looks up at most `limit` cities matching a partial name
    pub async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeMatch>, UpstreamError> {
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("appid", self.api_key.clone()),
        ];
        self.http
            .fetch_as(&self.url(DIRECT_GEOCODE_PATH), &params)
            .await
    }

    /// Fetches current conditions for a city in the given unit system
    pub async fn current_weather(&self, city: &str, units: &str) -> Result<Value, UpstreamError> {
        let params = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", units),
        ];
        self.http.fetch(&self.url(CURRENT_WEATHER_PATH), &params).await
    }

    /// Fetches the daily forecast for the given coordinates
    pub async fn daily_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: &str,
    ) -> Result<Value, UpstreamError> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("exclude", FORECAST_EXCLUDE.to_string()),
            ("appid", self.api_key.clone()),
            ("units", units.to_string()),
        ];
        self.http.fetch(&self.url(ONE_CALL_PATH), &params).await
    }
}
