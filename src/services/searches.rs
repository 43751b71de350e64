//! Search helper service
//!
//! Autocomplete suggestions backed by the geocoding provider, plus the two
//! small file-backed stores: recent searches and user settings.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::query_params;
use crate::cache::{geocode_ttl, ExactCache};
use crate::data::{default_suggestions, filter_common_cities, OpenWeatherClient, MAX_SUGGESTIONS};
use crate::error::ApiError;
use crate::store::{RecentSearches, Settings, SettingsStore};

/// Queries shorter than this get the built-in list without a provider call
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentSearchBody {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug)]
pub struct SearchesService {
    weather: OpenWeatherClient,
    suggestions: ExactCache<Vec<String>>,
    recent: RecentSearches,
    settings: SettingsStore,
}

impl SearchesService {
    pub fn new(weather: OpenWeatherClient, recent: RecentSearches, settings: SettingsStore) -> Self {
        Self {
            weather,
            suggestions: ExactCache::new(geocode_ttl()),
            recent,
            settings,
        }
    }

    pub fn suggestions_cache(&self) -> &ExactCache<Vec<String>> {
        &self.suggestions
    }

    /// City suggestions for a partial name
    ///
    /// Never fails: when the provider is unavailable the built-in cities
    /// matching `query` are returned instead, and nothing is cached.
    pub async fn suggest(&self, query: &str) -> Vec<String> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return default_suggestions();
        }

        if let Some(cached) = self.suggestions.get(query, None) {
            tracing::debug!("Returning cached suggestions for {}", query);
            return cached;
        }

        match self.weather.search_cities(query, MAX_SUGGESTIONS).await {
            Ok(matches) => {
                let labels: Vec<String> = matches.iter().map(|m| m.label()).collect();
                self.suggestions.put(query, labels.clone(), None);
                labels
            }
            Err(e) => {
                tracing::warn!("Error fetching suggestions for {}: {}", query, e);
                filter_common_cities(query)
            }
        }
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}

pub fn router(service: Arc<SearchesService>) -> Router {
    Router::new()
        .route("/suggestions", get(suggestions))
        .route("/recent-searches", get(list_recent).post(add_recent))
        .route("/settings", get(get_settings).post(update_settings))
        .with_state(service)
}

async fn suggestions(
    State(service): State<Arc<SearchesService>>,
    query: Result<Query<SuggestionsQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let query = query_params(query)?;
    Ok(Json(service.suggest(&query.query).await))
}

/// Runs file-backed store work on the blocking pool
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))
}

async fn list_recent(
    State(service): State<Arc<SearchesService>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let searches = blocking(move || service.recent.list()).await?;
    Ok(Json(searches))
}

async fn add_recent(
    State(service): State<Arc<SearchesService>>,
    body: Result<Json<RecentSearchBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // An unparseable body is reported the same way as a missing query
    let body = body.map(|Json(body)| body).unwrap_or_default();
    if body.query.is_empty() {
        return Err(ApiError::Validation("No search query provided".to_string()));
    }

    let query = body.query.clone();
    let recent_searches = blocking(move || service.recent.add(&query)).await??;
    tracing::info!("Added {} to recent searches", body.query);

    Ok(Json(json!({
        "message": "Search added to recent searches",
        "recent_searches": recent_searches,
    })))
}

async fn get_settings(
    State(service): State<Arc<SearchesService>>,
) -> Result<Json<Settings>, ApiError> {
    let settings = blocking(move || service.settings.get()).await?;
    Ok(Json(settings))
}

async fn update_settings(
    State(service): State<Arc<SearchesService>>,
    body: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) =
        body.map_err(|e| ApiError::Validation(format!("Invalid settings: {}", e.body_text())))?;

    let settings = blocking(move || service.settings.update(update)).await??;

    Ok(Json(json!({
        "message": "Settings updated successfully",
        "settings": settings,
    })))
}
