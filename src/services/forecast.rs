//! Daily forecast service
//!
//! `GET /forecast?city=&units=` runs the forecast resolver: cached forecast,
//! or coordinates from the sibling service followed by a provider call.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{query_params, required};
use crate::error::ApiError;
use crate::resolver::ForecastResolver;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug)]
pub struct ForecastService {
    resolver: ForecastResolver,
}

impl ForecastService {
    pub fn new(resolver: ForecastResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ForecastResolver {
        &self.resolver
    }
}

pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/forecast", get(forecast))
        .with_state(service)
}

async fn forecast(
    State(service): State<Arc<ForecastService>>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    const MISSING: &str =
        "Both city and units parameters are required to make forecast backend call";
    let query = query_params(query)?;
    let city = required(&query.city, MISSING)?;
    let units = required(&query.units, MISSING)?;

    Ok(Json(service.resolver.resolve(city, units).await?))
}
