//! Maps service
//!
//! Keeps the Google Maps key on the server: `GET /google-maps-key` hands it to
//! map widgets and `GET /geocode?location=` proxies address lookups.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{query_params, required};
use crate::data::GoogleGeocoder;
use crate::error::ApiError;

const KEY_NOT_CONFIGURED: &str = "Google Maps API key is not configured";

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub location: Option<String>,
}

#[derive(Debug)]
pub struct MapsService {
    geocoder: Option<GoogleGeocoder>,
}

impl MapsService {
    /// `None` leaves both endpoints answering with 500
    pub fn new(geocoder: Option<GoogleGeocoder>) -> Self {
        Self { geocoder }
    }

    fn geocoder(&self) -> Result<&GoogleGeocoder, ApiError> {
        self.geocoder
            .as_ref()
            .ok_or_else(|| ApiError::Internal(KEY_NOT_CONFIGURED.to_string()))
    }
}

pub fn router(service: Arc<MapsService>) -> Router {
    Router::new()
        .route("/google-maps-key", get(maps_key))
        .route("/geocode", get(geocode))
        .with_state(service)
}

async fn maps_key(State(service): State<Arc<MapsService>>) -> Result<Json<Value>, ApiError> {
    let geocoder = service.geocoder()?;
    Ok(Json(json!({ "apiKey": geocoder.api_key() })))
}

async fn geocode(
    State(service): State<Arc<MapsService>>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let query = query_params(query)?;
    let location = required(&query.location, "Location parameter is required")?;
    let geocoder = service.geocoder()?;

    let result = geocoder
        .geocode(location)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to geocode location"))?;

    Ok(Json(result))
}
