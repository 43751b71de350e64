//! Coordinates service
//!
//! `GET /coordinates?city=` forward geocodes a city name and returns the
//! provider's array of matches. The forecast service depends on this endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{query_params, required};
use crate::cache::{geocode_ttl, ExactCache};
use crate::data::OpenWeatherClient;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub city: Option<String>,
}

#[derive(Debug)]
pub struct CoordinatesService {
    weather: OpenWeatherClient,
    cache: ExactCache<Value>,
}

impl CoordinatesService {
    pub fn new(weather: OpenWeatherClient) -> Self {
        Self {
            weather,
            cache: ExactCache::new(geocode_ttl()),
        }
    }

    pub fn cache(&self) -> &ExactCache<Value> {
        &self.cache
    }

    /// Provider matches for `city`, cached for a day
    pub async fn lookup(&self, city: &str) -> Result<Value, ApiError> {
        if let Some(cached) = self.cache.get(city, None) {
            tracing::info!("Returning cached coordinate data for {}", city);
            return Ok(cached);
        }

        let coordinates = self
            .weather
            .direct_geocode(city)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to fetch coordinate data from API"))?;

        self.cache.put(city, coordinates.clone(), None);
        tracing::info!("Returning retrieved API coordinate data for {}", city);

        Ok(coordinates)
    }
}

pub fn router(service: Arc<CoordinatesService>) -> Router {
    Router::new()
        .route("/coordinates", get(coordinates))
        .with_state(service)
}

async fn coordinates(
    State(service): State<Arc<CoordinatesService>>,
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let query = query_params(query)?;
    let city = required(
        &query.city,
        "City parameter is required to make coordinate backend call",
    )?;

    Ok(Json(service.lookup(city).await?))
}
