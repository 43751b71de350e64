//! Errors returned by the HTTP services
//!
//! Every failure is rendered as `{"error": "<message>"}` with a status that
//! mirrors its class: 400 for bad input, 404 for unknown cities, the
//! provider's own status for upstream rejections, 500 for everything else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::data::UpstreamError;
use crate::resolver::ResolveError;
use crate::store::StoreError;

/// Error type for all service handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required parameter is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// The provider answered with a non-2xx status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// A provider or sibling service could not be reached
    #[error("{0}")]
    Transport(String),

    /// Anything else that went wrong while handling the request
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps an upstream failure, keeping the provider's status when it has one
    pub fn upstream(error: UpstreamError, message: &str) -> Self {
        match error {
            UpstreamError::Status(status) => ApiError::Upstream {
                status,
                message: message.to_string(),
            },
            other => ApiError::Transport(format!("{}: {}", message, other)),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Transport(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::CityNotFound => ApiError::NotFound(error.to_string()),
            ResolveError::CoordinateLookup(_) => ApiError::Transport(error.to_string()),
            ResolveError::Forecast(inner) => {
                ApiError::upstream(inner, "Failed to fetch weather data from API")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} {}", status.as_u16(), self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Transport("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_is_passed_through() {
        let error = ApiError::upstream(UpstreamError::Status(429), "Failed");
        assert_eq!(error.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(error.to_string(), "Failed");
    }

    #[test]
    fn test_invalid_upstream_status_becomes_bad_gateway() {
        let error = ApiError::Upstream {
            status: 42,
            message: "odd".into(),
        };
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_transport_failure_is_500_with_message() {
        let error = ApiError::upstream(
            UpstreamError::Transport("connection refused".into()),
            "Failed to fetch coordinate data from API",
        );
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_resolve_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(ResolveError::CityNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ResolveError::CoordinateLookup(UpstreamError::Status(404))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ResolveError::Forecast(UpstreamError::Status(401))).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_city_not_found_message() {
        assert_eq!(
            ApiError::from(ResolveError::CityNotFound).to_string(),
            "City not found"
        );
    }
}
