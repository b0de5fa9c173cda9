use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::summarize::summarize_payload;
use crate::state::AppState;
use crate::types::workout::{LiveStats, WorkoutSummary};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workout", get(status))
        .route("/api/workout/start", post(start))
        .route("/api/workout/stop", post(stop))
        .route("/api/workout/summary", get(summary))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    session_id: Uuid,
}

async fn start(State(state): State<AppState>) -> Result<Json<StartResponse>, AppError> {
    let session_id = state.start_workout().await?;
    Ok(Json(StartResponse { session_id }))
}

async fn status(State(state): State<AppState>) -> Result<Json<LiveStats>, AppError> {
    Ok(Json(state.live_stats().await?))
}

async fn stop(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.stop_workout().await? {
        Some(payload) => Ok(Json(payload).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn summary(State(state): State<AppState>) -> Result<Json<WorkoutSummary>, AppError> {
    let payload = state
        .handoff()
        .await
        .ok_or_else(|| AppError::NotFound("No completed workout".to_string()))?;

    Ok(Json(summarize_payload(&payload)?))
}
