//! HTTP services
//!
//! Each service is an independent axum router with its own caches, served on
//! its own port. The forecast service reaches the coordinates service over
//! HTTP like any other client would.

pub mod city_name;
pub mod conditions;
pub mod coordinates;
pub mod forecast;
pub mod maps;
pub mod searches;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::routing::get;
use axum::Router;
use clap::ValueEnum;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::data::{
    CoordinateServiceClient, GoogleGeocoder, OpenWeatherClient, UpstreamClient, UpstreamError,
};
use crate::error::ApiError;
use crate::resolver::ForecastResolver;
use crate::store::{RecentSearches, SettingsStore};

/// The services weatherhub can run, in port order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ServiceKind {
    /// Current conditions by city, and two-city comparison
    Conditions,
    /// Daily forecast by city
    Forecast,
    /// City name from coordinates
    CityName,
    /// Coordinates from a city name
    Coordinates,
    /// Google Maps key and address geocoding
    Maps,
    /// Suggestions, recent searches and settings
    Searches,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Conditions,
        ServiceKind::Forecast,
        ServiceKind::CityName,
        ServiceKind::Coordinates,
        ServiceKind::Maps,
        ServiceKind::Searches,
    ];

    /// Offset of this service's port from the base port
    pub fn port_offset(self) -> u16 {
        match self {
            ServiceKind::Conditions => 0,
            ServiceKind::Forecast => 1,
            ServiceKind::CityName => 2,
            ServiceKind::Coordinates => 3,
            ServiceKind::Maps => 4,
            ServiceKind::Searches => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Conditions => "conditions",
            ServiceKind::Forecast => "forecast",
            ServiceKind::CityName => "city-name",
            ServiceKind::Coordinates => "coordinates",
            ServiceKind::Maps => "maps",
            ServiceKind::Searches => "searches",
        }
    }

    /// Whether this service calls OpenWeatherMap
    pub fn needs_openweather_key(self) -> bool {
        !matches!(self, ServiceKind::Maps)
    }
}

/// Builds the router for one service from the runtime configuration
pub fn build_router(kind: ServiceKind, config: &Config) -> Result<Router, UpstreamError> {
    let http = UpstreamClient::new(config.timeout)?;
    let weather = || {
        OpenWeatherClient::with_base_url(
            http.clone(),
            config.openweather_base_url.clone(),
            config.openweather_key.clone(),
        )
    };

    let router = match kind {
        ServiceKind::Conditions => {
            conditions::router(Arc::new(conditions::ConditionsService::new(weather())))
        }
        ServiceKind::Forecast => {
            let coordinates =
                CoordinateServiceClient::new(http.clone(), config.coordinates_url.clone());
            forecast::router(Arc::new(forecast::ForecastService::new(
                ForecastResolver::new(coordinates, weather()),
            )))
        }
        ServiceKind::CityName => {
            city_name::router(Arc::new(city_name::CityNameService::new(weather())))
        }
        ServiceKind::Coordinates => {
            coordinates::router(Arc::new(coordinates::CoordinatesService::new(weather())))
        }
        ServiceKind::Maps => {
            let geocoder = config.google_maps_key.as_ref().map(|key| {
                GoogleGeocoder::with_url(http.clone(), config.google_geocode_url.clone(), key)
            });
            maps::router(Arc::new(maps::MapsService::new(geocoder)))
        }
        ServiceKind::Searches => searches::router(Arc::new(searches::SearchesService::new(
            weather(),
            RecentSearches::new(config.recent_searches_path()),
            SettingsStore::new(config.settings_path()),
        ))),
    };

    Ok(with_liveness(router, kind))
}

/// Adds `GET /` answering with a short liveness message
pub fn with_liveness(router: Router, kind: ServiceKind) -> Router {
    let message = format!("{} service is running", kind.name());
    router.route("/", get(move || std::future::ready(message.clone())))
}

/// Binds `addr` and serves `router` until the process exits
pub async fn serve(kind: ServiceKind, addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("{} service listening on {}", kind.name(), listener.local_addr()?);
    axum::serve(listener, router).await
}

/// Returns a query parameter exactly as given, or a validation error if it is
/// missing or empty
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

/// Unpacks extracted query parameters, turning a malformed query string into
/// a JSON validation error instead of axum's plain-text rejection
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::Validation(e.body_text()))
}
