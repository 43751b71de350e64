//! Forecast orchestration
//!
//! A forecast request runs through four steps, and any failing step ends the
//! request without caching anything:
//!
//! 1. Look up the city in the forecast cache, keyed by name and unit system
//! 2. Ask the coordinates service for the city's coordinates
//! 3. Fetch the daily forecast for the first coordinate pair
//! 4. Cache the forecast under the city name and unit system

use serde_json::Value;
use thiserror::Error;

use crate::cache::{live_weather_ttl, ExactCache};
use crate::data::{CoordinateServiceClient, OpenWeatherClient, UpstreamError};

/// Errors that end a forecast resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The coordinates service knows no city by that name
    #[error("City not found")]
    CityNotFound,

    /// The coordinates service could not be queried
    #[error("Error fetching coordinates from backend: {0}")]
    CoordinateLookup(UpstreamError),

    /// The forecast provider rejected the request or was unreachable
    #[error("Failed to fetch weather data from API: {0}")]
    Forecast(UpstreamError),
}

/// Resolves city names to daily forecasts, caching the results
#[derive(Debug)]
pub struct ForecastResolver {
    cache: ExactCache<Value>,
    coordinates: CoordinateServiceClient,
    weather: OpenWeatherClient,
}

impl ForecastResolver {
    /// Creates a resolver with a 30-minute forecast cache
    pub fn new(coordinates: CoordinateServiceClient, weather: OpenWeatherClient) -> Self {
        Self::with_cache(ExactCache::new(live_weather_ttl()), coordinates, weather)
    }

    /// Creates a resolver around an existing cache
    pub fn with_cache(
        cache: ExactCache<Value>,
        coordinates: CoordinateServiceClient,
        weather: OpenWeatherClient,
    ) -> Self {
        Self {
            cache,
            coordinates,
            weather,
        }
    }

    pub fn cache(&self) -> &ExactCache<Value> {
        &self.cache
    }

    /// Returns the daily forecast for `city` in the given unit system
    pub async fn resolve(&self, city: &str, units: &str) -> Result<Value, ResolveError> {
        if let Some(forecast) = self.cache.get(city, Some(units)) {
            tracing::info!("Returning cached weather forecast for {}", city);
            return Ok(forecast);
        }

        let candidates = self
            .coordinates
            .resolve(city)
            .await
            .map_err(ResolveError::CoordinateLookup)?;
        let location = candidates.first().ok_or(ResolveError::CityNotFound)?;

        let forecast = self
            .weather
            .daily_forecast(location.lat, location.lon, units)
            .await
            .map_err(ResolveError::Forecast)?;

        self.cache.put(city, forecast.clone(), Some(units));
        tracing::info!("Returning fetched weather forecast from API for {}", city);

        Ok(forecast)
    }
}
