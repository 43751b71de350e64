//! Current conditions service
//!
//! `GET /saved_searches?city=&units=` returns the provider's current weather
//! document for a city, cached for 30 minutes per city and unit system.
//! `GET /compare?city1=&city2=` summarizes two cities side by side in
//! imperial units, going through the same cache.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{query_params, required};
use crate::cache::{live_weather_ttl, ExactCache};
use crate::data::{CityComparison, CurrentConditions, OpenWeatherClient};
use crate::error::ApiError;

/// Unit system used for comparisons
pub const COMPARE_UNITS: &str = "imperial";

#[derive(Debug, Deserialize)]
pub struct ConditionsQuery {
    pub city: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub city1: Option<String>,
    pub city2: Option<String>,
}

/// State for the conditions service
#[derive(Debug)]
pub struct ConditionsService {
    weather: OpenWeatherClient,
    cache: ExactCache<Value>,
}

impl ConditionsService {
    pub fn new(weather: OpenWeatherClient) -> Self {
        Self {
            weather,
            cache: ExactCache::new(live_weather_ttl()),
        }
    }

    pub fn cache(&self) -> &ExactCache<Value> {
        &self.cache
    }

    /// Current conditions for `city`, from cache when fresh
    pub async fn current(&self, city: &str, units: &str) -> Result<Value, ApiError> {
        if let Some(cached) = self.cache.get(city, Some(units)) {
            tracing::info!("Returning cached weather conditions for {}", city);
            return Ok(cached);
        }

        let conditions = self
            .weather
            .current_weather(city, units)
            .await
            .map_err(|e| ApiError::upstream(e, "Failed to fetch weather data from API"))?;

        self.cache.put(city, conditions.clone(), Some(units));
        tracing::info!("Returning fetched API weather conditions for {}", city);

        Ok(conditions)
    }

    /// Side-by-side summary of two cities
    pub async fn compare(&self, city1: &str, city2: &str) -> Result<Vec<CityComparison>, ApiError> {
        let (first, second) = futures::try_join!(
            self.current(city1, COMPARE_UNITS),
            self.current(city2, COMPARE_UNITS)
        )?;

        [first, second]
            .into_iter()
            .map(|document| -> Result<CityComparison, ApiError> {
                let conditions: CurrentConditions = serde_json::from_value(document)
                    .map_err(|e| ApiError::Internal(format!("Unexpected weather data: {}", e)))?;
                Ok(CityComparison::from(&conditions))
            })
            .collect()
    }
}

pub fn router(service: Arc<ConditionsService>) -> Router {
    Router::new()
        .route("/saved_searches", get(current_conditions))
        .route("/compare", get(compare))
        .with_state(service)
}

async fn current_conditions(
    State(service): State<Arc<ConditionsService>>,
    query: Result<Query<ConditionsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    const MISSING: &str =
        "Both city and units parameters are required to make weather conditions backend call";
    let query = query_params(query)?;
    let city = required(&query.city, MISSING)?;
    let units = required(&query.units, MISSING)?;

    Ok(Json(service.current(city, units).await?))
}

async fn compare(
    State(service): State<Arc<ConditionsService>>,
    query: Result<Query<CompareQuery>, QueryRejection>,
) -> Result<Json<Vec<CityComparison>>, ApiError> {
    const MISSING: &str = "Please provide two cities to compare";
    let query = query_params(query)?;
    let city1 = required(&query.city1, MISSING)?;
    let city2 = required(&query.city2, MISSING)?;

    Ok(Json(service.compare(city1, city2).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UpstreamClient;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_service(server: &MockServer) -> ConditionsService {
        ConditionsService::new(OpenWeatherClient::with_base_url(
            UpstreamClient::default(),
            server.uri(),
            "test-key",
        ))
    }

    fn conditions_body(name: &str, temp: f64) -> Value {
        json!({
            "name": name,
            "weather": [{"main": "Clouds", "description": "broken clouds"}],
            "main": {"temp": temp, "feels_like": temp - 1.0},
            "wind": {"speed": 5.0, "deg": 90},
            "sys": {"sunset": 1718395200},
            "timezone": 0
        })
    }

    #[tokio::test]
    async fn test_current_is_cached_per_units() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body("Paris", 60.0)))
            .expect(2)
            .mount(&mock_server)
            .await;

        let service = create_test_service(&mock_server);
        service.current("Paris", "imperial").await.unwrap();
        service.current("Paris", "imperial").await.unwrap();
        service.current("Paris", "metric").await.unwrap();

        assert_eq!(service.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_current_passes_provider_status_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let service = create_test_service(&mock_server);
        let err = service.current("Atlantis", "imperial").await.unwrap_err();

        assert_eq!(err.status().as_u16(), 404);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_compare_shapes_both_cities() {
        let mock_server = MockServer::start().await;

        for (city, temp) in [("Paris", 68.0), ("Rome", 75.5)] {
            Mock::given(method("GET"))
                .and(path("/data/2.5/weather"))
                .and(query_param("q", city))
                .and(query_param("units", COMPARE_UNITS))
                .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body(city, temp)))
                .mount(&mock_server)
                .await;
        }

        let service = create_test_service(&mock_server);
        let comparison = service.compare("Paris", "Rome").await.unwrap();

        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison[0].city, "Paris");
        assert_eq!(comparison[0].temp, "68°F");
        assert_eq!(comparison[1].city, "Rome");
        assert_eq!(comparison[1].temp, "75.5°F");
        assert_eq!(comparison[1].wind_direction, "E");
        assert_eq!(comparison[1].sunset, "08:00 PM");
    }

    #[tokio::test]
    async fn test_compare_fails_if_either_city_fails() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(conditions_body("Paris", 60.0)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let service = create_test_service(&mock_server);
        let err = service.compare("Paris", "Atlantis").await.unwrap_err();

        assert_eq!(err.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_handler_requires_city_and_units() {
        let mock_server = MockServer::start().await;
        let service = Arc::new(create_test_service(&mock_server));

        let result = current_conditions(
            State(service),
            Ok(Query(ConditionsQuery {
                city: Some("Paris".to_string()),
                units: None,
            })),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
