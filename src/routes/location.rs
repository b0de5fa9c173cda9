use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, TrackingError};
use crate::location::{LocationProvider, PermissionStatus};
use crate::pipeline::record::follow_region;
use crate::state::AppState;
use crate::types::position::PositionSample;
use crate::types::workout::MapRegion;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/location/permission", put(set_permission))
        .route("/api/location/fix", post(push_fix))
        .route("/api/location/failure", post(report_failure))
        .route("/api/location/current", get(current))
}

#[derive(Deserialize)]
struct PermissionRequest {
    granted: bool,
}

#[derive(Serialize, Deserialize)]
struct PermissionResponse {
    status: PermissionStatus,
}

async fn set_permission(
    State(state): State<AppState>,
    Json(request): Json<PermissionRequest>,
) -> Json<PermissionResponse> {
    let status = if request.granted {
        PermissionStatus::Granted
    } else {
        PermissionStatus::Denied
    };
    state.provider.set_permission(status);
    Json(PermissionResponse { status })
}

async fn push_fix(
    State(state): State<AppState>,
    Json(sample): Json<PositionSample>,
) -> Result<StatusCode, AppError> {
    if !(-90.0..=90.0).contains(&sample.latitude) || !(-180.0..=180.0).contains(&sample.longitude)
    {
        return Err(AppError::BadRequest(format!(
            "Coordinates out of range: {}, {}",
            sample.latitude, sample.longitude
        )));
    }

    state.provider.push(sample);
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
struct FailureReport {
    message: String,
}

async fn report_failure(
    State(state): State<AppState>,
    Json(report): Json<FailureReport>,
) -> StatusCode {
    state.provider.fail(report.message);
    StatusCode::ACCEPTED
}

#[derive(Serialize, Deserialize)]
struct CurrentLocation {
    location: PositionSample,
    region: MapRegion,
}

async fn current(State(state): State<AppState>) -> Result<Json<CurrentLocation>, AppError> {
    if !state.provider.request_permission().is_granted() {
        return Err(TrackingError::PermissionDenied.into());
    }

    let location = state
        .provider
        .current_position()
        .map_err(TrackingError::from)?;

    Ok(Json(CurrentLocation {
        location,
        region: follow_region(&location),
    }))
}
