use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("No location fix available yet")]
    Unavailable,
    #[error("Location updates stopped unexpectedly")]
    Closed,
    #[error("Location provider failed: {0}")]
    Device(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackingError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("A workout is already being recorded")]
    AlreadyActive,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Recording task is no longer running")]
    RecorderGone,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Invalid distance: {0}")]
    InvalidDistance(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Tracking(TrackingError::PermissionDenied) => StatusCode::FORBIDDEN,
            AppError::Tracking(TrackingError::AlreadyActive) => StatusCode::CONFLICT,
            AppError::Tracking(TrackingError::Provider(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Tracking(TrackingError::RecorderGone) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Summary(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
