//! Unified error handling for the dashboard.
//!
//! Form pages re-render themselves on validation and backend failures, so
//! `AppError` covers what is left: unreadable uploads and the JSON location
//! endpoint. Every error answers with `{"message": ...}`.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::geocoding::GeocodingError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reverse geocoding failed.
    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodingError),

    /// Reverse geocoding is not configured.
    #[error("Location lookup is not configured")]
    GeocodingUnavailable,

    /// The multipart body could not be read, or exceeds the upload limit.
    #[error("Invalid upload: {0}")]
    Upload(#[from] MultipartError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Geocoding(_) => StatusCode::BAD_GATEWAY,
            Self::GeocodingUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upload(err) => err.status(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether the error points at a fault worth reporting to Sentry.
    const fn is_reportable(&self) -> bool {
        matches!(self, Self::Geocoding(err) if !matches!(err, GeocodingError::NoResults))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.is_reportable() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose upstream details to clients
        let message = match self {
            Self::Geocoding(_) => "Failed to get address details".to_string(),
            Self::Upload(err) => err.body_text(),
            Self::BadRequest(message) => message,
            Self::GeocodingUnavailable => "Location lookup is not configured".to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
        assert_eq!(
            AppError::GeocodingUnavailable.to_string(),
            "Location lookup is not configured"
        );
    }

    #[tokio::test]
    async fn test_app_error_status_codes() {
        let (status, body) = render(AppError::BadRequest("Invalid location: x".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid location: x");

        let (status, body) = render(AppError::GeocodingUnavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Location lookup is not configured");

        let (status, _) = render(AppError::Geocoding(GeocodingError::NoResults)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_geocoding_details_are_hidden() {
        let err = AppError::Geocoding(GeocodingError::Api {
            status: "REQUEST_DENIED".to_string(),
            message: "The provided API key is invalid".to_string(),
        });
        assert!(err.is_reportable());

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Failed to get address details");
    }

    #[test]
    fn test_no_results_is_not_reported() {
        assert!(!AppError::Geocoding(GeocodingError::NoResults).is_reportable());
        assert!(!AppError::GeocodingUnavailable.is_reportable());
    }
}
