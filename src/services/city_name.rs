//! City name service
//!
//! `GET /name?lat=&lon=` reverse geocodes a coordinate pair. Results are kept
//! for a day and reused for any later request within about ten miles.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{query_params, required};
use crate::cache::{geocode_ttl, GeoCache};
use crate::data::OpenWeatherClient;
use crate::error::ApiError;

const MISSING_COORDINATES: &str =
    "Latitude and Longitude parameters are required to make city name backend request";

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug)]
pub struct CityNameService {
    weather: OpenWeatherClient,
    cache: GeoCache<Value>,
}

impl CityNameService {
    pub fn new(weather: OpenWeatherClient) -> Self {
        Self {
            weather,
            cache: GeoCache::new(geocode_ttl()),
        }
    }

    pub fn cache(&self) -> &GeoCache<Value> {
        &self.cache
    }

    /// Place name for the coordinates, reusing any cached nearby lookup
    pub async fn lookup(&self, lat: f64, lon: f64) -> Result<Value, ApiError> {
        if let Some(cached) = self.cache.get(lat, lon) {
            tracing::info!(
                "Returning city name for lat: {:.2} and lon: {:.2} from cached name data",
                lat,
                lon
            );
            return Ok(cached);
        }

        let name = self.weather.reverse_geocode(lat, lon).await.map_err(|e| {
            ApiError::upstream(
                e,
                "Failed to fetch city name by lat and lon coordinates from API",
            )
        })?;

        self.cache.put(lat, lon, name.clone());
        tracing::info!(
            "Returning city name for lat: {:.2} and lon: {:.2} from API",
            lat,
            lon
        );

        Ok(name)
    }
}

pub fn router(service: Arc<CityNameService>) -> Router {
    Router::new()
        .route("/name", get(city_name))
        .with_state(service)
}

async fn city_name(
    State(service): State<Arc<CityNameService>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let query = query_params(query)?;
    let lat = parse_coordinate(&query.lat)?;
    let lon = parse_coordinate(&query.lon)?;

    Ok(Json(service.lookup(lat, lon).await?))
}

/// Parses a required, finite coordinate parameter
fn parse_coordinate(value: &Option<String>) -> Result<f64, ApiError> {
    let raw = required(value, MISSING_COORDINATES)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::Validation(format!("Invalid coordinate: {}", raw)))
}
